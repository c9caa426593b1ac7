use thiserror::Error;

/// Reasons a lens table cannot be turned into a [`LensCatalog`](super::model::LensCatalog).
///
/// Both are fatal: the loader never hands out a partially built catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// A required column is absent after header normalisation.
    #[error("sheet '{sheet}': missing required column '{column}'")]
    Schema { sheet: String, column: String },

    /// A cell could not be read as the type its column requires.
    /// `row` is the 1-based spreadsheet row (the header is row 1).
    #[error("sheet '{sheet}', row {row}, column '{column}': {reason} (got '{value}')")]
    DataFormat {
        sheet: String,
        row: usize,
        column: String,
        value: String,
        reason: String,
    },
}
