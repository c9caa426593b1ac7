use std::collections::{HashMap, HashSet};

use eframe::egui::{Color32, Ui};
use egui_plot::{GridInput, GridMark, Legend, Line, Plot, PlotPoints, Points};

use fe_lens_chart::chart::{Chart, APERTURE_TICKS, FOCAL_TICKS};
use fe_lens_chart::data::model::format_number;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Lens chart (central panel)
// ---------------------------------------------------------------------------

/// Render the focal length / aperture chart in the central panel.
///
/// Both axes are log scale: points are plotted at `log2` of their value and
/// the axis labels undo that.
pub fn lens_plot(ui: &mut Ui, state: &AppState) {
    let chart = state.chart();
    if chart.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No lenses match the current filters");
        });
        return;
    }

    let labels = item_labels(&chart);
    let hover = hover_by_label(&chart, &labels);

    let mut plot = Plot::new("lens_plot")
        .x_axis_label("Focal Length")
        .y_axis_label("Aperture")
        .x_axis_formatter(|mark, _range| format!("{}mm", tick_label(mark.value)))
        .y_axis_formatter(|mark, _range| format!("f/{}", tick_label(mark.value)))
        .x_grid_spacer(|input| log_ticks(&FOCAL_TICKS, input))
        .y_grid_spacer(|input| log_ticks(&APERTURE_TICKS, input))
        .label_formatter(move |name, point| match hover.get(name) {
            Some(text) => text.clone(),
            None => format!(
                "{}mm, f/{}",
                tick_label(point.x),
                tick_label(point.y)
            ),
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if chart.show_legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (series, label) in chart.series.iter().zip(&labels) {
            let [r, g, b] = series.color;
            let color = Color32::from_rgb(r, g, b).gamma_multiply(series.opacity as f32);
            let coords: Vec<[f64; 2]> = series
                .points()
                .iter()
                .map(|[fl, ap]| [fl.log2(), ap.log2()])
                .collect();

            if coords.len() > 1 {
                let line_points: PlotPoints = coords.iter().copied().collect();
                plot_ui.line(
                    Line::new(line_points)
                        .name(label)
                        .color(color)
                        .width(series.size as f32),
                );
            }

            let marker_points: PlotPoints = coords.into_iter().collect();
            plot_ui.points(
                Points::new(marker_points)
                    .name(label)
                    .color(color)
                    .radius(series.size as f32 / 2.0),
            );
        }
    });
}

/// One plot-item name per series. Lens names repeat across the Exif sheets,
/// so later duplicates get a `(2)`, `(3)`, ... suffix.
fn item_labels(chart: &Chart) -> Vec<String> {
    let mut used = HashSet::new();
    chart
        .series
        .iter()
        .map(|s| {
            let mut label = s.name.clone();
            let mut n = 1;
            while !used.insert(label.clone()) {
                n += 1;
                label = format!("{} ({n})", s.name);
            }
            label
        })
        .collect()
}

fn hover_by_label(chart: &Chart, labels: &[String]) -> HashMap<String, String> {
    chart
        .series
        .iter()
        .zip(labels)
        .map(|(s, label)| (label.clone(), s.hover.join("\n")))
        .collect()
}

/// Grid marks at the fixed tick values that fall inside the visible bounds.
fn log_ticks(ticks: &[f64], input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    ticks
        .iter()
        .map(|t| t.log2())
        .filter(|v| *v >= min && *v <= max)
        .map(|value| GridMark {
            value,
            step_size: 1.0,
        })
        .collect()
}

/// Linear value of a log2 coordinate, rounded for display.
fn tick_label(log_value: f64) -> String {
    format_number((log_value.exp2() * 10.0).round() / 10.0)
}
