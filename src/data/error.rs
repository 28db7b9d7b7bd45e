use thiserror::Error;

/// Errors raised while turning an input file into a [`Dataset`].
///
/// Every variant is fatal for the whole load: no partial dataset is ever
/// returned.
///
/// [`Dataset`]: super::model::Dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// `row` is the 1-based data row (header excluded).
    #[error("row {row}: '{value}' is not a 4-digit year")]
    InvalidYear { row: usize, value: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    /// Column present but of a type that cannot hold the expected values.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl LoadError {
    /// Whether this is a content problem (bad year, bad number, missing
    /// column, ragged or non-UTF-8 CSV row) rather than a problem reading
    /// the file at all.
    pub fn is_parse_error(&self) -> bool {
        match self {
            LoadError::MissingColumn { .. }
            | LoadError::InvalidYear { .. }
            | LoadError::InvalidNumber { .. }
            | LoadError::Schema(_) => true,
            LoadError::Csv(e) => matches!(
                e.kind(),
                csv::ErrorKind::UnequalLengths { .. } | csv::ErrorKind::Utf8 { .. }
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
