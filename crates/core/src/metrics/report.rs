//! Metrics report: the enriched table plus the windows it was computed over.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::fiscal::{FiscalYear, PeriodWindows};

use super::delta::DeltaCalculator;
use super::error::MetricsError;
use super::types::{GroupBy, Performance, ProductMetrics};

/// Result of one metrics run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Key the rows are grouped on.
    pub group_by: GroupBy,
    /// Windows every row was computed over.
    pub windows: PeriodWindows,
    /// One row per key, in key order.
    pub rows: Vec<ProductMetrics>,
}

/// Portfolio-level totals across all rows of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Number of rows.
    pub row_count: usize,
    /// Total YTD sales.
    pub ytd_sales: Decimal,
    /// Total PYTD sales.
    pub pytd_sales: Decimal,
    /// Total P1YTD sales.
    pub p1ytd_sales: Decimal,
    /// Total YTD quantity.
    pub ytd_quantity: i64,
    /// Total PYTD quantity.
    pub pytd_quantity: i64,
    /// Total P1YTD quantity.
    pub p1ytd_quantity: i64,
    /// Total YTD - PYTD sales.
    pub delta_ytd_pytd: Decimal,
    /// Overall YTD vs PYTD growth in percent; zero when PYTD is zero.
    pub growth_ytd_vs_pytd_pct: Decimal,
    /// Overall YTD vs P1YTD growth in percent; zero when P1YTD is zero.
    pub growth_ytd_vs_p1ytd_pct: Decimal,
    /// Rows classified as growing.
    pub growing: usize,
    /// Rows classified as declining.
    pub declining: usize,
    /// Rows classified as stable.
    pub stable: usize,
}

/// Largest movers on each side of the YTD vs PYTD delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopMovers<'a> {
    /// Growing rows, largest positive delta first.
    pub growing: Vec<&'a ProductMetrics>,
    /// Declining rows, largest negative delta first.
    pub declining: Vec<&'a ProductMetrics>,
}

/// A metrics row serialized with its key under the report's key column.
///
/// `ProductMetrics` always names its key `product_name`; exports go through
/// this wrapper so a category report writes `category` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyedMetrics<'a> {
    /// Column name for the key.
    pub key_column: &'static str,
    /// Row being serialized.
    pub row: &'a ProductMetrics,
}

impl Serialize for KeyedMetrics<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self.row;
        let mut state = serializer.serialize_struct("ProductMetrics", 18)?;
        state.serialize_field(self.key_column, &row.product_name)?;
        state.serialize_field("ytd_sales", &row.ytd_sales)?;
        state.serialize_field("ytd_quantity", &row.ytd_quantity)?;
        state.serialize_field("pytd_sales", &row.pytd_sales)?;
        state.serialize_field("pytd_quantity", &row.pytd_quantity)?;
        state.serialize_field("p1ytd_sales", &row.p1ytd_sales)?;
        state.serialize_field("p1ytd_quantity", &row.p1ytd_quantity)?;
        state.serialize_field("as_of_date", &row.as_of_date)?;
        state.serialize_field("fiscal_year", &row.fiscal_year)?;
        state.serialize_field("delta_ytd_pytd", &row.delta_ytd_pytd)?;
        state.serialize_field("delta_ytd_p1ytd", &row.delta_ytd_p1ytd)?;
        state.serialize_field("delta_pytd_p1ytd", &row.delta_pytd_p1ytd)?;
        state.serialize_field("growth_ytd_vs_pytd_pct", &row.growth_ytd_vs_pytd_pct)?;
        state.serialize_field("growth_ytd_vs_p1ytd_pct", &row.growth_ytd_vs_p1ytd_pct)?;
        state.serialize_field("qty_delta_ytd_pytd", &row.qty_delta_ytd_pytd)?;
        state.serialize_field("qty_delta_ytd_p1ytd", &row.qty_delta_ytd_p1ytd)?;
        state.serialize_field("abs_delta_ytd_pytd", &row.abs_delta_ytd_pytd)?;
        state.serialize_field("performance", &row.performance)?;
        state.end()
    }
}

impl MetricsReport {
    /// As-of date of the run.
    #[must_use]
    pub const fn as_of_date(&self) -> NaiveDate {
        self.windows.as_of_date
    }

    /// Fiscal year of the as-of date.
    #[must_use]
    pub const fn fiscal_year(&self) -> FiscalYear {
        self.windows.fiscal_year
    }

    /// Looks up the row for a key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&ProductMetrics> {
        self.rows.iter().find(|r| r.product_name == key)
    }

    /// Rows tagged with this report's key column, for export.
    #[must_use]
    pub fn keyed_rows(&self) -> Vec<KeyedMetrics<'_>> {
        let key_column = self.group_by.key_column();
        self.rows
            .iter()
            .map(|row| KeyedMetrics { key_column, row })
            .collect()
    }

    /// Totals across all rows.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if a portfolio total, its delta or a
    /// growth rate overflows.
    pub fn summary(&self) -> Result<MetricsSummary, MetricsError> {
        let overflow = || MetricsError::overflow("all rows", "summary");
        let sum = |f: fn(&ProductMetrics) -> Decimal| {
            self.rows
                .iter()
                .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(f(r)))
                .ok_or_else(overflow)
        };
        let sum_qty = |f: fn(&ProductMetrics) -> i64| {
            self.rows
                .iter()
                .try_fold(0_i64, |acc, r| acc.checked_add(f(r)))
                .ok_or_else(overflow)
        };
        let growth = |current: Decimal, base: Decimal| {
            DeltaCalculator::growth_pct(current, base).ok_or_else(overflow)
        };
        let count = |p: Performance| self.rows.iter().filter(|r| r.performance == p).count();

        let ytd_sales = sum(|r| r.ytd_sales)?;
        let pytd_sales = sum(|r| r.pytd_sales)?;
        let p1ytd_sales = sum(|r| r.p1ytd_sales)?;

        Ok(MetricsSummary {
            row_count: self.rows.len(),
            ytd_sales,
            pytd_sales,
            p1ytd_sales,
            ytd_quantity: sum_qty(|r| r.ytd_quantity)?,
            pytd_quantity: sum_qty(|r| r.pytd_quantity)?,
            p1ytd_quantity: sum_qty(|r| r.p1ytd_quantity)?,
            delta_ytd_pytd: ytd_sales.checked_sub(pytd_sales).ok_or_else(overflow)?,
            growth_ytd_vs_pytd_pct: growth(ytd_sales, pytd_sales)?,
            growth_ytd_vs_p1ytd_pct: growth(ytd_sales, p1ytd_sales)?,
            growing: count(Performance::Growing),
            declining: count(Performance::Declining),
            stable: count(Performance::Stable),
        })
    }

    /// Rows ordered by YTD vs PYTD growth, lowest first; ties by key.
    #[must_use]
    pub fn ranked_by_growth(&self) -> Vec<&ProductMetrics> {
        let mut ranked: Vec<&ProductMetrics> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            a.growth_ytd_vs_pytd_pct
                .cmp(&b.growth_ytd_vs_pytd_pct)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        ranked
    }

    /// Up to `n` rows on each side of the YTD vs PYTD delta.
    #[must_use]
    pub fn top_movers(&self, n: usize) -> TopMovers<'_> {
        let by_delta = |a: &&ProductMetrics, b: &&ProductMetrics| -> Ordering {
            b.abs_delta_ytd_pytd
                .cmp(&a.abs_delta_ytd_pytd)
                .then_with(|| a.product_name.cmp(&b.product_name))
        };

        let mut growing: Vec<&ProductMetrics> = self
            .rows
            .iter()
            .filter(|r| r.performance == Performance::Growing)
            .collect();
        growing.sort_by(by_delta);
        growing.truncate(n);

        let mut declining: Vec<&ProductMetrics> = self
            .rows
            .iter()
            .filter(|r| r.performance == Performance::Declining)
            .collect();
        declining.sort_by(by_delta);
        declining.truncate(n);

        TopMovers { growing, declining }
    }
}
