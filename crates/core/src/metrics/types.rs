//! Metrics data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The key a metrics table is grouped and joined on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One row per product.
    #[default]
    Product,
    /// One row per product category.
    Category,
}

impl GroupBy {
    /// Column name of the key in exported tables.
    #[must_use]
    pub const fn key_column(&self) -> &'static str {
        match self {
            Self::Product => "product_name",
            Self::Category => "category",
        }
    }
}

/// Sales and quantity totals for one key in one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Sum of sales amounts.
    pub sales: Decimal,
    /// Sum of quantities.
    pub quantity: i64,
}

impl PeriodTotals {
    /// Adds a sale to these totals.
    ///
    /// Returns `None` if either sum overflows.
    #[must_use]
    pub fn checked_add(self, sales: Decimal, quantity: i64) -> Option<Self> {
        Some(Self {
            sales: self.sales.checked_add(sales)?,
            quantity: self.quantity.checked_add(quantity)?,
        })
    }
}

/// Aggregated totals for one key within one comparison window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPeriodSummary {
    /// Grouping key (a product name, or a category in category rollups).
    pub product_name: String,
    /// Sum of sales amounts within the window.
    pub period_sales_total: Decimal,
    /// Sum of quantities within the window.
    pub period_quantity_total: i64,
}

/// One joined row: the three window totals plus run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledMetrics {
    /// Grouping key.
    pub product_name: String,
    /// YTD sales.
    pub ytd_sales: Decimal,
    /// YTD quantity.
    pub ytd_quantity: i64,
    /// PYTD sales.
    pub pytd_sales: Decimal,
    /// PYTD quantity.
    pub pytd_quantity: i64,
    /// P1YTD sales.
    pub p1ytd_sales: Decimal,
    /// P1YTD quantity.
    pub p1ytd_quantity: i64,
    /// As-of date of the run.
    pub as_of_date: NaiveDate,
    /// Fiscal year label of the as-of date.
    pub fiscal_year: String,
}

/// Performance classification derived from the YTD vs PYTD delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Performance {
    /// YTD sales exceed PYTD sales.
    Growing,
    /// YTD sales are below PYTD sales.
    Declining,
    /// YTD sales equal PYTD sales.
    Stable,
}

impl Performance {
    /// Classifies a YTD - PYTD sales delta.
    #[must_use]
    pub fn classify(delta: Decimal) -> Self {
        match delta.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Self::Growing,
            std::cmp::Ordering::Less => Self::Declining,
            std::cmp::Ordering::Equal => Self::Stable,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Growing => "Growing",
            Self::Declining => "Declining",
            Self::Stable => "Stable",
        }
    }
}

impl std::fmt::Display for Performance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully enriched metrics for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetrics {
    /// Grouping key.
    pub product_name: String,
    /// YTD sales.
    pub ytd_sales: Decimal,
    /// YTD quantity.
    pub ytd_quantity: i64,
    /// PYTD sales.
    pub pytd_sales: Decimal,
    /// PYTD quantity.
    pub pytd_quantity: i64,
    /// P1YTD sales.
    pub p1ytd_sales: Decimal,
    /// P1YTD quantity.
    pub p1ytd_quantity: i64,
    /// As-of date of the run.
    pub as_of_date: NaiveDate,
    /// Fiscal year label of the as-of date.
    pub fiscal_year: String,
    /// YTD - PYTD sales.
    pub delta_ytd_pytd: Decimal,
    /// YTD - P1YTD sales.
    pub delta_ytd_p1ytd: Decimal,
    /// PYTD - P1YTD sales.
    pub delta_pytd_p1ytd: Decimal,
    /// Growth of YTD over PYTD in percent; zero when PYTD is zero.
    pub growth_ytd_vs_pytd_pct: Decimal,
    /// Growth of YTD over P1YTD in percent; zero when P1YTD is zero.
    pub growth_ytd_vs_p1ytd_pct: Decimal,
    /// YTD - PYTD quantity.
    pub qty_delta_ytd_pytd: i64,
    /// YTD - P1YTD quantity.
    pub qty_delta_ytd_p1ytd: i64,
    /// Absolute YTD - PYTD sales delta.
    pub abs_delta_ytd_pytd: Decimal,
    /// Performance classification.
    pub performance: Performance,
}
