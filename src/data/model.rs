use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single raw spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell, as read from a workbook or CSV export.
/// Only the loader looks at these; descriptive columns keep them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_number(*v)),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Text is not parsed here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Format a float without a trailing `.0` for whole numbers (`886`, `2.8`).
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Focus {
    AF,
    MF,
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Focus::AF => "AF",
            Focus::MF => "MF",
        })
    }
}

/// Which source sheet a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Exif {
    Yes,
    No,
}

impl fmt::Display for Exif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Exif::Yes => "Yes",
            Exif::No => "No",
        })
    }
}

/// Prime (fixed focal length) or zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LensKind {
    Prime,
    Zoom,
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LensKind::Prime => "Prime",
            LensKind::Zoom => "Zoom",
        })
    }
}

// ---------------------------------------------------------------------------
// LensRecord – one row of the merged table
// ---------------------------------------------------------------------------

/// Descriptive columns carried through to display without interpretation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Descriptive {
    pub aperture_blades: Option<CellValue>,
    pub elements_groups: Option<CellValue>,
    pub optical_stabilizer: Option<CellValue>,
    pub used_price: Option<CellValue>,
    pub comments: Option<CellValue>,
}

/// One lens variant. `focal_length` and `aperture` always have the same,
/// non-zero length; see [`LensRecord::kind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensRecord {
    pub lens: String,
    pub manufacturer: String,
    /// mm, one value for primes, zoom-range breakpoints otherwise.
    pub focal_length: Vec<f64>,
    /// f-number at each focal-length breakpoint.
    pub aperture: Vec<f64>,
    /// grams
    pub weight: f64,
    pub price: f64,
    pub magnification: f64,
    /// mm; `None` when the sheet says `na` or leaves the cell empty.
    pub filter_diameter: Option<f64>,
    /// cm
    pub close_focusing_distance: f64,
    /// mm
    pub diameter: f64,
    /// mm
    pub length: f64,
    pub focus: Focus,
    pub exif: Exif,
    pub descriptive: Descriptive,
}

impl LensRecord {
    pub fn kind(&self) -> LensKind {
        if self.focal_length.len() == 1 {
            LensKind::Prime
        } else {
            LensKind::Zoom
        }
    }

    pub fn focal_length_bounds(&self) -> (f64, f64) {
        bounds(&self.focal_length)
    }

    pub fn aperture_bounds(&self) -> (f64, f64) {
        bounds(&self.aperture)
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

// ---------------------------------------------------------------------------
// LensCatalog – the complete loaded table
// ---------------------------------------------------------------------------

/// The normalised, weight-sorted lens table. Built once by the loader and
/// only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct LensCatalog {
    lenses: Vec<LensRecord>,
    /// Manufacturers in first-seen order of the sorted table.
    manufacturers: Vec<String>,
}

impl LensCatalog {
    /// Sort by weight (heaviest first) and index the manufacturers.
    /// Ties keep their input order.
    pub fn from_records(mut lenses: Vec<LensRecord>) -> Self {
        lenses.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        let mut manufacturers: Vec<String> = Vec::new();
        for lens in &lenses {
            if !manufacturers.contains(&lens.manufacturer) {
                manufacturers.push(lens.manufacturer.clone());
            }
        }

        LensCatalog {
            lenses,
            manufacturers,
        }
    }

    pub fn lenses(&self) -> &[LensRecord] {
        &self.lenses
    }

    /// Manufacturers in first-seen order (heaviest lens first).
    pub fn manufacturers(&self) -> &[String] {
        &self.manufacturers
    }

    /// Manufacturers sorted alphabetically, for selection lists.
    pub fn sorted_manufacturers(&self) -> Vec<String> {
        let sorted: BTreeSet<&String> = self.manufacturers.iter().collect();
        sorted.into_iter().cloned().collect()
    }

    /// Distinct filter diameters present in the catalog, ascending.
    pub fn filter_diameters(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .lenses
            .iter()
            .filter_map(|l| l.filter_diameter)
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        values
    }

    pub fn len(&self) -> usize {
        self.lenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lenses.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn lens(name: &str, maker: &str, fl: &[f64], ap: &[f64], weight: f64) -> LensRecord {
        LensRecord {
            lens: name.to_string(),
            manufacturer: maker.to_string(),
            focal_length: fl.to_vec(),
            aperture: ap.to_vec(),
            weight,
            price: 1000.0,
            magnification: 0.2,
            filter_diameter: Some(67.0),
            close_focusing_distance: 30.0,
            diameter: 70.0,
            length: 100.0,
            focus: Focus::AF,
            exif: Exif::Yes,
            descriptive: Descriptive::default(),
        }
    }

    #[test]
    fn kind_follows_focal_length_count() {
        assert_eq!(lens("p", "S", &[50.0], &[1.8], 186.0).kind(), LensKind::Prime);
        assert_eq!(
            lens("z", "S", &[24.0, 70.0], &[2.8, 2.8], 886.0).kind(),
            LensKind::Zoom
        );
    }

    #[test]
    fn catalog_sorts_heaviest_first_and_indexes_manufacturers() {
        let catalog = LensCatalog::from_records(vec![
            lens("a", "Sony", &[50.0], &[1.8], 186.0),
            lens("b", "Sigma", &[24.0, 70.0], &[2.8, 2.8], 886.0),
            lens("c", "Sony", &[85.0], &[1.4], 820.0),
            lens("d", "Samyang", &[35.0], &[1.8], 186.0),
        ]);
        let names: Vec<&str> = catalog.lenses().iter().map(|l| l.lens.as_str()).collect();
        assert_eq!(names, ["b", "c", "a", "d"]);
        assert_eq!(catalog.manufacturers(), ["Sigma", "Sony", "Samyang"]);
        assert_eq!(catalog.sorted_manufacturers(), ["Samyang", "Sigma", "Sony"]);
    }

    #[test]
    fn filter_diameters_skip_missing_values() {
        let mut no_filter = lens("fish", "Samyang", &[12.0], &[2.8], 500.0);
        no_filter.filter_diameter = None;
        let mut small = lens("small", "Sony", &[50.0], &[1.8], 186.0);
        small.filter_diameter = Some(49.0);
        let catalog = LensCatalog::from_records(vec![
            no_filter,
            small,
            lens("x", "Sony", &[85.0], &[1.8], 371.0),
            lens("y", "Sony", &[35.0], &[1.8], 280.0),
        ]);
        assert_eq!(catalog.filter_diameters(), vec![49.0, 67.0]);
    }

    #[test]
    fn numbers_drop_trailing_zero() {
        assert_eq!(format_number(886.0), "886");
        assert_eq!(format_number(2.8), "2.8");
        assert_eq!(CellValue::Float(67.0).to_string(), "67");
    }
}
