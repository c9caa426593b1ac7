//! Series expansion: turns filtered catalog rows into plottable series.
//!
//! A zoom becomes a connected line through one point per focal-length
//! breakpoint, a prime a single point. Size, opacity and colour are derived
//! here and never stored on the records.

use serde::{Deserialize, Serialize};

use crate::color::ManufacturerColors;
use crate::data::model::{format_number, Exif, LensCatalog, LensRecord};

/// Focal-length axis ticks (mm, log scale).
pub const FOCAL_TICKS: [f64; 19] = [
    10.0, 12.0, 16.0, 20.0, 24.0, 28.0, 35.0, 50.0, 70.0, 85.0, 100.0, 135.0, 150.0, 200.0,
    250.0, 300.0, 400.0, 500.0, 600.0,
];

/// Aperture axis ticks (f-number, log scale).
pub const APERTURE_TICKS: [f64; 9] = [1.0, 1.4, 2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0];

/// One lens as drawn: parallel point sequences plus its visual encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensSeries {
    pub name: String,
    pub manufacturer: String,
    pub focal_length: Vec<f64>,
    pub aperture: Vec<f64>,
    /// Marker diameter and line width, px.
    pub size: f64,
    pub opacity: f64,
    pub color: [u8; 3],
    pub hover: Vec<String>,
}

impl LensSeries {
    pub fn from_record(lens: &LensRecord, colors: &ManufacturerColors) -> Self {
        let color = colors.color_for(&lens.manufacturer);
        LensSeries {
            name: lens.lens.clone(),
            manufacturer: lens.manufacturer.clone(),
            focal_length: lens.focal_length.clone(),
            aperture: lens.aperture.clone(),
            size: marker_size(lens.weight),
            opacity: opacity(lens.weight),
            color: [color.red, color.green, color.blue],
            hover: hover_lines(lens),
        }
    }

    /// `[focal length, aperture]` pairs.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.focal_length
            .iter()
            .zip(&self.aperture)
            .map(|(&fl, &ap)| [fl, ap])
            .collect()
    }
}

/// The chart description handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Heaviest lens first, so lighter lenses are drawn on top.
    pub series: Vec<LensSeries>,
    pub show_legend: bool,
}

impl Chart {
    /// Expand the catalog rows at `indices`, keeping their order.
    pub fn build(
        catalog: &LensCatalog,
        indices: &[usize],
        colors: &ManufacturerColors,
        show_legend: bool,
    ) -> Self {
        let series = indices
            .iter()
            .filter_map(|&i| catalog.lenses().get(i))
            .map(|lens| LensSeries::from_record(lens, colors))
            .collect();
        Chart {
            series,
            show_legend,
        }
    }

    /// Every lens in the catalog.
    pub fn full(catalog: &LensCatalog, colors: &ManufacturerColors) -> Self {
        let all: Vec<usize> = (0..catalog.len()).collect();
        Chart::build(catalog, &all, colors, true)
    }
}

pub fn marker_size(weight: f64) -> f64 {
    25.0 * (weight / 500.0).powf(0.7)
}

pub fn opacity(weight: f64) -> f64 {
    0.4 * 500.0 / (weight + 500.0) + 0.1
}

/// Three lines: name; focus, EXIF, reproduction ratio and filter; weight and size.
pub fn hover_lines(lens: &LensRecord) -> Vec<String> {
    let no_exif = if lens.exif == Exif::No { ", No Exif" } else { "" };
    let ratio = if lens.magnification > 0.0 {
        format_number(((1.0 / lens.magnification) * 10.0).round() / 10.0)
    } else {
        "?".to_string()
    };
    let filter = lens
        .filter_diameter
        .map(format_number)
        .unwrap_or_else(|| "n/a".to_string());

    vec![
        lens.lens.clone(),
        format!(
            "{}{no_exif}, 1:{ratio} ({}cm), ø{filter}",
            lens.focus,
            format_number(lens.close_focusing_distance)
        ),
        format!(
            "{}g, ø{}mm x {}mm",
            format_number(lens.weight),
            format_number(lens.diameter),
            format_number(lens.length)
        ),
    ]
}

/// Short human number: `950`, `1.5K`, `12K`, `2.5M`.
pub fn compact_number(v: f64) -> String {
    let (scaled, suffix) = match v.abs() {
        a if a >= 1e9 => (v / 1e9, "B"),
        a if a >= 1e6 => (v / 1e6, "M"),
        a if a >= 1e3 => (v / 1e3, "K"),
        _ => (v, ""),
    };
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{}{suffix}", format_number(rounded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::lens;
    use crate::data::model::Focus;

    #[test]
    fn zoom_expands_to_one_point_per_breakpoint() {
        let zoom = lens("FE 24-70mm F2.8 GM", "Sony", &[24.0, 70.0], &[2.8, 2.8], 886.0);
        let prime = lens("FE 50mm F1.8", "Sony", &[50.0], &[1.8], 186.0);
        let catalog = LensCatalog::from_records(vec![prime, zoom]);
        let colors = ManufacturerColors::new(&catalog);

        let chart = Chart::full(&catalog, &colors);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].points(), vec![[24.0, 2.8], [70.0, 2.8]]);
        assert_eq!(chart.series[1].points(), vec![[50.0, 1.8]]);
        assert_eq!(chart.series[0].color, chart.series[1].color);
    }

    #[test]
    fn build_keeps_index_order_and_skips_unknown_rows() {
        let catalog = LensCatalog::from_records(vec![
            lens("a", "Sony", &[50.0], &[1.8], 500.0),
            lens("b", "Sony", &[85.0], &[1.8], 400.0),
        ]);
        let colors = ManufacturerColors::new(&catalog);
        let chart = Chart::build(&catalog, &[1, 7], &colors, false);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "b");
        assert!(!chart.show_legend);
    }

    #[test]
    fn visual_encoding_scales_with_weight() {
        assert!((marker_size(500.0) - 25.0).abs() < 1e-12);
        assert!(marker_size(1000.0) > marker_size(500.0));
        assert!((opacity(500.0) - 0.3).abs() < 1e-12);
        assert!(opacity(2000.0) < opacity(200.0));
    }

    #[test]
    fn hover_text() {
        let mut l = lens("Fisheye 8mm", "Meike", &[8.0], &[3.5], 350.0);
        l.exif = Exif::No;
        l.focus = Focus::MF;
        l.magnification = 0.15;
        l.close_focusing_distance = 20.0;
        l.filter_diameter = None;
        l.diameter = 70.0;
        l.length = 60.5;
        assert_eq!(
            hover_lines(&l),
            vec![
                "Fisheye 8mm".to_string(),
                "MF, No Exif, 1:6.7 (20cm), øn/a".to_string(),
                "350g, ø70mm x 60.5mm".to_string(),
            ]
        );
    }

    #[test]
    fn compact_numbers() {
        assert_eq!(compact_number(950.0), "950");
        assert_eq!(compact_number(1000.0), "1K");
        assert_eq!(compact_number(1500.0), "1.5K");
        assert_eq!(compact_number(12000.0), "12K");
        assert_eq!(compact_number(2_500_000.0), "2.5M");
    }
}
