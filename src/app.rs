use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LensChartApp {
    pub state: AppState,
}

impl LensChartApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LensChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: facet controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: visible lenses ----
        if self.state.show_table {
            egui::TopBottomPanel::bottom("lens_table")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    table::lens_table(ui, &self.state);
                });
        }

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::lens_plot(ui, &self.state);
        });
    }
}
