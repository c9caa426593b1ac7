use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use fe_lens_chart::data::model::{format_number, CellValue, LensRecord};

use crate::state::AppState;

const HEADERS: [&str; 12] = [
    "Lens",
    "Manufacturer",
    "Focal Length",
    "Aperture",
    "Weight [g]",
    "Price",
    "Magnification",
    "Filter [mm]",
    "Focus",
    "Exif",
    "Elements & Groups",
    "Comments",
];

/// Table of the lenses currently passing the filters, heaviest first.
pub fn lens_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(180.0))
        .columns(Column::auto(), HEADERS.len() - 2)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let Some(lens) = state
                    .visible_indices
                    .get(row.index())
                    .and_then(|&i| state.catalog.lenses().get(i))
                else {
                    return;
                };
                let c = state.colors.color_for(&lens.manufacturer);

                for (i, cell) in row_cells(lens).into_iter().enumerate() {
                    row.col(|ui| {
                        if i == 1 {
                            let color = Color32::from_rgb(c.red, c.green, c.blue);
                            ui.label(RichText::new(cell).color(color));
                        } else {
                            ui.label(cell);
                        }
                    });
                }
            });
        });
}

fn row_cells(lens: &LensRecord) -> Vec<String> {
    vec![
        lens.lens.clone(),
        lens.manufacturer.clone(),
        format!("{}mm", joined(&lens.focal_length)),
        format!("f/{}", joined(&lens.aperture)),
        format_number(lens.weight),
        format_number(lens.price),
        format!("{}x", format_number(lens.magnification)),
        lens.filter_diameter.map(format_number).unwrap_or_else(|| "n/a".to_string()),
        lens.focus.to_string(),
        lens.exif.to_string(),
        optional(&lens.descriptive.elements_groups),
        optional(&lens.descriptive.comments),
    ]
}

/// `24-70`; a constant aperture shows once.
fn joined(values: &[f64]) -> String {
    let mut values = values.to_vec();
    values.dedup();
    values
        .into_iter()
        .map(format_number)
        .collect::<Vec<_>>()
        .join("-")
}

fn optional(value: &Option<CellValue>) -> String {
    value.as_ref().map(CellValue::to_string).unwrap_or_default()
}
