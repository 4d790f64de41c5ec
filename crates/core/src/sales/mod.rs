//! Sales log records and their validation.

pub mod error;
pub mod record;

pub use error::InvalidRecordError;
pub use record::{RawSalesRecord, SalesRecord, latest_date, parse_records};
