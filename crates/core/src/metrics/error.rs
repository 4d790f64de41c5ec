//! Metrics pipeline error types.

use thiserror::Error;

/// Errors that can occur while calculating metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// No as-of date was given and there are no records to derive one from.
    #[error("No sales records available to derive an as-of date")]
    NoRecords,

    /// A sum or difference left the range of its numeric type.
    #[error("Arithmetic overflow in {stage} for '{key}'")]
    Overflow {
        /// Grouping key whose value overflowed.
        key: String,
        /// Pipeline stage that overflowed.
        stage: &'static str,
    },
}

impl MetricsError {
    /// Creates an overflow error for `key` in `stage`.
    pub fn overflow(key: impl Into<String>, stage: &'static str) -> Self {
        Self::Overflow {
            key: key.into(),
            stage,
        }
    }
}
