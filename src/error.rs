//! Error types for the demandcast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading, modeling, or exporting forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Underlying file I/O failure (open, read, save).
    #[error("io error: {0}")]
    Io(String),

    /// The requested worksheet does not exist in the workbook.
    #[error("worksheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// A required column is missing from the header row.
    #[error("required column '{0}' not found in header row")]
    MissingColumn(String),

    /// A cell could not be converted to the expected type.
    #[error("row {row}: invalid '{column}' cell: {detail}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        detail: String,
    },

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Series dates are not strictly increasing, or otherwise malformed.
    #[error("date error: {0}")]
    DateError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Numerical failure during model estimation.
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Chart rendering failed.
    #[error("chart error: {0}")]
    ChartError(String),
}
