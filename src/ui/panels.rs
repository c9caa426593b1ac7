use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use fe_lens_chart::chart::compact_number;
use fe_lens_chart::config::{CHART_TITLE, DATA_SOURCE_URL, PROJECT_URL};
use fe_lens_chart::data::filter::{LogRange, SLIDER_STEP};
use fe_lens_chart::data::model::{format_number, Exif, Focus, LensKind};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – facet controls
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(CHART_TITLE);
        ui.label("Size indicates weight");
    });
    ui.separator();

    // Clone what we need so we can mutate state inside the loops.
    let manufacturers = state.catalog.sorted_manufacturers();
    let diameters = state.catalog.filter_diameters();
    let sliders = state.sliders;
    let before = state.query.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height((ui.available_height() - 48.0).max(120.0))
        .show(ui, |ui: &mut Ui| {
            // ---- Manufacturer (multi-select) ----
            let header = format!(
                "Manufacturer  ({}/{})",
                state.query.manufacturers.len(),
                manufacturers.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("manufacturer")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.query.manufacturers.clear();
                    }
                    for m in &manufacturers {
                        let c = state.colors.color_for(m);
                        let color = Color32::from_rgb(c.red, c.green, c.blue);
                        let text = RichText::new(m).color(color);
                        let mut checked = state.query.manufacturers.contains(m);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_manufacturer(m);
                        }
                    }
                });

            // ---- Single-choice facets ----
            ui.horizontal(|ui: &mut Ui| {
                choice(ui, "Type", &mut state.query.kind, &[LensKind::Prime, LensKind::Zoom]);
                choice(ui, "Focus", &mut state.query.focus, &[Focus::AF, Focus::MF]);
                choice(ui, "Exif", &mut state.query.exif, &[Exif::Yes, Exif::No]);
            });
            ui.separator();

            // ---- Log-scale range sliders ----
            log_range_slider(
                ui,
                "Focal Length",
                &mut state.query.focal_length,
                sliders.focal_length,
                |v| format!("{v:.0}mm"),
            );
            log_range_slider(ui, "Aperture", &mut state.query.aperture, sliders.aperture, |v| {
                format!("f/{v:.1}")
            });
            log_range_slider(ui, "Weight", &mut state.query.weight, sliders.weight, |v| {
                format!("{}g", compact_number(v.round()).replace('K', "k"))
            });
            log_range_slider(
                ui,
                "Magnification",
                &mut state.query.magnification,
                sliders.magnification,
                |v| format!("{v:.2}x"),
            );
            log_range_slider(ui, "Price", &mut state.query.price, sliders.price, |v| {
                format!("${}", compact_number(v.round()))
            });
            ui.separator();

            // ---- Filter diameter (multi-select) ----
            let header = format!(
                "Filter Diameter [mm]  ({}/{})",
                state.query.filter_diameters.len(),
                diameters.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("filter_diameter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.query.filter_diameters.clear();
                    }
                    for &d in &diameters {
                        let mut checked = state.query.filter_diameters.contains(&d);
                        if ui.checkbox(&mut checked, format_number(d)).changed() {
                            state.toggle_filter_diameter(d);
                        }
                    }
                });

            ui.add_space(6.0);
            ui.checkbox(&mut state.show_legend, "Show legend");
        });

    ui.separator();
    ui.vertical_centered(|ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.small("Data from");
            ui.hyperlink_to("phillipreeve.net", DATA_SOURCE_URL);
        });
        ui.horizontal(|ui: &mut Ui| {
            ui.small("Feature requests, bugs:");
            ui.hyperlink_to("github", PROJECT_URL);
        });
    });

    // Recompute visible lenses after any control change.
    if state.query != before {
        state.refilter();
    }
}

/// Dropdown with an "Any" entry meaning the facet is unset.
fn choice<T>(ui: &mut Ui, label: &str, value: &mut Option<T>, options: &[T])
where
    T: Copy + PartialEq + std::fmt::Display,
{
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        let selected = value.map(|v| v.to_string()).unwrap_or_else(|| "Any".to_string());
        egui::ComboBox::from_id_salt(label)
            .selected_text(selected)
            .width(70.0)
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(value, None, "Any");
                for &option in options {
                    ui.selectable_value(value, Some(option), option.to_string());
                }
            });
    });
}

/// Two sliders (from / to) moving in log2 space; labels show `2^v`.
fn log_range_slider(
    ui: &mut Ui,
    label: &str,
    range: &mut Option<LogRange>,
    travel: LogRange,
    format: fn(f64) -> String,
) {
    ui.strong(label);
    let current = range.get_or_insert(travel);

    let lo = ui.add(
        Slider::new(&mut current.lo, travel.lo..=travel.hi)
            .step_by(SLIDER_STEP)
            .custom_formatter(move |v, _| format(v.exp2()))
            .text("from"),
    );
    let hi = ui.add(
        Slider::new(&mut current.hi, travel.lo..=travel.hi)
            .step_by(SLIDER_STEP)
            .custom_formatter(move |v, _| format(v.exp2()))
            .text("to"),
    );

    // Keep the handles from crossing.
    if lo.changed() && current.lo > current.hi {
        current.hi = current.lo;
    } else if hi.changed() && current.hi < current.lo {
        current.lo = current.hi;
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open workbook…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open CSV folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ui.label(format!(
            "{source}: {} lenses loaded, {} visible",
            state.catalog.len(),
            state.visible_indices.len()
        ));

        ui.separator();

        if ui.button("Reset filters").clicked() {
            state.reset_filters();
        }

        if ui.selectable_label(state.show_table, "Lens table").clicked() {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open lens workbook")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder with All.csv and no exif.csv")
        .pick_folder();

    if let Some(path) = folder {
        state.open(&path);
    }
}
