use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fe_lens_chart::chart::Chart;
use fe_lens_chart::color::ManufacturerColors;
use fe_lens_chart::config::{DEFAULT_OUTPUT, DEFAULT_PLOTLY_SRC, DEFAULT_WORKBOOK};
use fe_lens_chart::data::loader::load_file;
use fe_lens_chart::html::render_chart_page;

/// Write the full, unfiltered lens chart as a static HTML page.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lens workbook (.xlsx/.ods) or folder with `All.csv` and `no exif.csv`
    #[arg(long, env = "LENS_CHART_WORKBOOK", default_value = DEFAULT_WORKBOOK)]
    workbook: PathBuf,

    /// Output HTML path
    #[arg(short, long, env = "LENS_CHART_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Script URL for plotly.js
    #[arg(long, default_value = DEFAULT_PLOTLY_SRC)]
    plotly_src: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let catalog = load_file(&args.workbook)
        .with_context(|| format!("loading {}", args.workbook.display()))?;
    let colors = ManufacturerColors::new(&catalog);
    let chart = Chart::full(&catalog, &colors);
    let page = render_chart_page(&chart, &args.plotly_src);

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(&args.output, page)
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!(
        "Wrote {} lenses to {}",
        chart.series.len(),
        args.output.display()
    );
    Ok(())
}
