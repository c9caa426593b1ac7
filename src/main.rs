mod app;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use app::LensChartApp;
use clap::Parser;
use eframe::egui;
use fe_lens_chart::config::{CHART_TITLE, DEFAULT_WORKBOOK};
use fe_lens_chart::data::loader::load_file;
use state::AppState;

/// Interactive, filterable chart of Sony FE lenses.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lens workbook (.xlsx/.ods) or folder with `All.csv` and `no exif.csv`
    #[arg(long, env = "LENS_CHART_WORKBOOK", default_value = DEFAULT_WORKBOOK)]
    workbook: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_file(&args.workbook)
        .inspect_err(|e| log::error!("Failed to load lens catalog: {e:#}"))
        .with_context(|| format!("loading {}", args.workbook.display()))?;
    let state = AppState::new(catalog, args.workbook);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        CHART_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(LensChartApp::new(state)))),
    )
    .map_err(|e| anyhow!("dashboard exited with an error: {e}"))
}
