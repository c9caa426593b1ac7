//! Sony FE lens chart: load the lens spreadsheet, filter it and describe the
//! resulting chart for the dashboard or a static HTML page.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod html;

pub use chart::{Chart, LensSeries};
pub use color::ManufacturerColors;
pub use data::error::LoadError;
pub use data::filter::{filtered_indices, LensQuery, LogRange, SliderRanges};
pub use data::loader::{load_file, normalize};
pub use data::model::{Exif, Focus, LensCatalog, LensKind, LensRecord};
