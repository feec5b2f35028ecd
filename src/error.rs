use thiserror::Error;

/// Errors raised while building the in-memory snapshot from CSV inputs.
///
/// A failed load leaves any previously loaded snapshot untouched; callers
/// keep the old data and report the error.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("no usable rows in input table")]
    EmptyTable,
}

/// A count bucket had no matching baseline total.
///
/// Totals are derived from a superset of the records behind the counts, so
/// this cannot happen for well-formed input; it signals a bug in the filter
/// or aggregation stage, not a recoverable condition.
#[derive(Error, Debug)]
#[error("count bucket {dimension_value:?} has no matching baseline total")]
pub struct ConsistencyError {
    pub dimension_value: String,
}

/// Errors raised while exporting query results to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
