//! Surveillance engine error types.

use thiserror::Error;

/// Surveillance engine errors.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveillanceError {
    /// A required column is absent from the table.
    #[error("Schema error: no column matching {expected}")]
    Schema { expected: String },

    /// The metric predicate matched no column.
    #[error("No metric columns: no column matches the metric predicate")]
    NoMetricColumns,

    /// The selected metric column does not exist.
    #[error("Unknown metric column: {0}")]
    UnknownMetric(String),

    /// The window selects no rows.
    #[error("Empty window: no rows between {start} and {end}")]
    EmptyWindow { start: String, end: String },

    /// The window has rows but no usable values.
    #[error("All values missing for {metric} in window")]
    AllMissing { metric: String },

    /// Window and series use different period representations.
    #[error("Period kind mismatch: series uses {series}, window uses {window}")]
    PeriodKindMismatch { series: String, window: String },

    /// A period appears twice under the reject policy.
    #[error("Duplicate period: {0}")]
    DuplicatePeriod(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SurveillanceError {
    /// Schema error for a missing column described by `expected`.
    pub fn schema(expected: impl Into<String>) -> Self {
        Self::Schema {
            expected: expected.into(),
        }
    }
}

/// Result type for surveillance operations.
pub type Result<T> = std::result::Result<T, SurveillanceError>;
