//! Sales log records.
//!
//! Input providers hand over [`RawSalesRecord`]s (string fields, as read from
//! a CSV file). They are validated into typed [`SalesRecord`]s before any
//! metric is calculated.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::error::InvalidRecordError;

/// Timestamp layouts accepted in addition to a bare `YYYY-MM-DD` date.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// One line of the sales log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Transaction date.
    pub date: NaiveDate,
    /// Product sold.
    pub product_name: String,
    /// Sales amount. Negative values represent returns.
    pub sales_amount: Decimal,
    /// Units sold.
    pub quantity: i64,
}

impl SalesRecord {
    /// Creates a new sales record.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        product_name: impl Into<String>,
        sales_amount: Decimal,
        quantity: i64,
    ) -> Self {
        Self {
            date,
            product_name: product_name.into(),
            sales_amount,
            quantity,
        }
    }
}

/// A sales record with unvalidated string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSalesRecord {
    /// Transaction date, `YYYY-MM-DD` optionally followed by a time.
    pub date: String,
    /// Product sold.
    pub product_name: String,
    /// Sales amount as a decimal string.
    pub sales_amount: String,
    /// Units sold as an integer string.
    pub quantity: String,
}

impl TryFrom<RawSalesRecord> for SalesRecord {
    type Error = InvalidRecordError;

    fn try_from(raw: RawSalesRecord) -> Result<Self, Self::Error> {
        let date = parse_date(&raw.date)?;

        let product_name = raw.product_name.trim();
        if product_name.is_empty() {
            return Err(InvalidRecordError::MissingProductName);
        }

        let sales_amount = parse_amount(&raw.sales_amount)?;
        let quantity = parse_quantity(&raw.quantity)?;

        Ok(Self::new(date, product_name, sales_amount, quantity))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, InvalidRecordError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| InvalidRecordError::InvalidDate {
            value: value.to_string(),
        })
}

fn parse_amount(value: &str) -> Result<Decimal, InvalidRecordError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| InvalidRecordError::InvalidAmount {
            value: value.to_string(),
        })
}

/// Parses an integer quantity, tolerating a zero fractional part (`"3.0"`).
fn parse_quantity(value: &str) -> Result<i64, InvalidRecordError> {
    let trimmed = value.trim();
    if let Ok(quantity) = trimmed.parse::<i64>() {
        return Ok(quantity);
    }

    Decimal::from_str(trimmed)
        .ok()
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_i64())
        .ok_or_else(|| InvalidRecordError::InvalidQuantity {
            value: value.to_string(),
        })
}

/// Validates a batch of raw records, failing on the first invalid one.
///
/// The returned error carries the zero-based position of the bad record.
pub fn parse_records<I>(raw: I) -> Result<Vec<SalesRecord>, InvalidRecordError>
where
    I: IntoIterator<Item = RawSalesRecord>,
{
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| SalesRecord::try_from(record).map_err(|e| e.at_record(index)))
        .collect()
}

/// Returns the most recent transaction date, if any.
#[must_use]
pub fn latest_date(records: &[SalesRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).max()
}
