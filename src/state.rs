use std::path::{Path, PathBuf};

use fe_lens_chart::chart::Chart;
use fe_lens_chart::color::ManufacturerColors;
use fe_lens_chart::data::filter::{filtered_indices, LensQuery, SliderRanges};
use fe_lens_chart::data::loader::load_file;
use fe_lens_chart::data::model::LensCatalog;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded catalog; replaced whole, never edited.
    pub catalog: LensCatalog,

    /// Where `catalog` was read from.
    pub source: PathBuf,

    /// Current control values.
    pub query: LensQuery,

    /// Full travel of each range slider for this catalog.
    pub sliders: SliderRanges,

    /// Indices of lenses passing the current query.
    pub visible_indices: Vec<usize>,

    /// Colour per manufacturer.
    pub colors: ManufacturerColors,

    pub show_legend: bool,

    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(catalog: LensCatalog, source: PathBuf) -> Self {
        let sliders = SliderRanges::for_catalog(&catalog);
        let mut state = Self {
            colors: ManufacturerColors::new(&catalog),
            query: sliders.full_query(),
            visible_indices: Vec::new(),
            sliders,
            catalog,
            source,
            show_legend: false,
            show_table: false,
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Ingest a newly loaded catalog and reset every control.
    pub fn set_catalog(&mut self, catalog: LensCatalog, source: PathBuf) {
        let show_legend = self.show_legend;
        let show_table = self.show_table;
        *self = AppState::new(catalog, source);
        self.show_legend = show_legend;
        self.show_table = show_table;
    }

    /// Load another workbook. On failure the current catalog stays.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(catalog) => self.set_catalog(catalog, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute `visible_indices` after a control change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.catalog, &self.query);
    }

    /// Put every control back to "show everything".
    pub fn reset_filters(&mut self) {
        self.query = self.sliders.full_query();
        self.refilter();
    }

    /// Toggle a manufacturer in the selection.
    pub fn toggle_manufacturer(&mut self, manufacturer: &str) {
        if !self.query.manufacturers.remove(manufacturer) {
            self.query.manufacturers.insert(manufacturer.to_string());
        }
        self.refilter();
    }

    /// Toggle a filter diameter in the selection.
    pub fn toggle_filter_diameter(&mut self, diameter: f64) {
        let selected = &mut self.query.filter_diameters;
        match selected.iter().position(|&d| d == diameter) {
            Some(pos) => {
                selected.remove(pos);
            }
            None => selected.push(diameter),
        }
        self.refilter();
    }

    /// Chart description for the visible lenses.
    pub fn chart(&self) -> Chart {
        Chart::build(&self.catalog, &self.visible_indices, &self.colors, self.show_legend)
    }
}
