//! Error types for the pace-outliers crate.

use crate::core::TimeSliceKey;
use thiserror::Error;

/// Result type alias for outlier scoring operations.
pub type Result<T> = std::result::Result<T, OutlierError>;

/// Errors that can occur while loading, scoring, merging or reporting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutlierError {
    /// Input table has no data rows.
    #[error("empty input data")]
    EmptyData,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between an observation and the feature columns.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Scoring failed for one weekday/hour cohort.
    #[error("cohort {weekday} {hour}: {source}")]
    CohortFailed {
        weekday: String,
        hour: u8,
        #[source]
        source: Box<OutlierError>,
    },

    /// Two cohorts produced the same (date, hour, weekday) key.
    #[error("duplicate key in merged results: {0}")]
    DuplicateKey(TimeSliceKey),

    /// A scored time slice has no global pace value.
    #[error("no global pace for {0}")]
    MissingBaseline(TimeSliceKey),

    /// Malformed input row.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// CSV reader or writer failure.
    #[error("csv error: {0}")]
    Csv(String),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for OutlierError {
    fn from(err: std::io::Error) -> Self {
        OutlierError::Io(err.to_string())
    }
}

impl From<csv::Error> for OutlierError {
    fn from(err: csv::Error) -> Self {
        OutlierError::Csv(err.to_string())
    }
}
