//! Sales record error types.

use thiserror::Error;

/// A sales record that cannot be turned into a [`SalesRecord`](super::SalesRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRecordError {
    /// The date is missing or not a calendar date.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Raw value as received.
        value: String,
    },

    /// The product name is empty.
    #[error("Product name must not be empty")]
    MissingProductName,

    /// The sales amount is not a decimal number.
    #[error("Invalid sales amount '{value}'")]
    InvalidAmount {
        /// Raw value as received.
        value: String,
    },

    /// The quantity is not an integer.
    #[error("Invalid quantity '{value}'")]
    InvalidQuantity {
        /// Raw value as received.
        value: String,
    },

    /// A record failed validation at a known position in the input.
    #[error("Record {index}: {source}")]
    AtRecord {
        /// Zero-based position of the record in the input.
        index: usize,
        /// The underlying problem.
        #[source]
        source: Box<InvalidRecordError>,
    },
}

impl InvalidRecordError {
    /// Attaches the record position to this error.
    #[must_use]
    pub fn at_record(self, index: usize) -> Self {
        Self::AtRecord {
            index,
            source: Box::new(self),
        }
    }
}
