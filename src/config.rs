//! Built-in defaults. The binaries expose the paths as command-line flags.

/// Workbook read when no `--workbook` is given.
pub const DEFAULT_WORKBOOK: &str = "Sony FE lens list by phillipreeve.net cleaned.xlsx";

/// Sheet whose lenses have EXIF data.
pub const SHEET_EXIF: &str = "All";

/// Sheet whose lenses do not.
pub const SHEET_NO_EXIF: &str = "no exif";

/// Where the static chart is written.
pub const DEFAULT_OUTPUT: &str = "docs/index.html";

pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const CHART_TITLE: &str = "Sony FE Lens Chart";

pub const DATA_SOURCE_URL: &str = "https://phillipreeve.net/blog/fe-list/";

pub const PROJECT_URL: &str = "https://github.com/asgerlh/sony_fe_lens_chart";
