//! Delta, growth and performance calculations.

use rust_decimal::Decimal;

use super::error::MetricsError;
use super::types::{AssembledMetrics, Performance, ProductMetrics};

/// Enriches assembled rows with deltas, growth rates and performance labels.
pub struct DeltaCalculator;

impl DeltaCalculator {
    /// Enriches every row; the input table is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the first `MetricsError::Overflow` raised by [`Self::enrich_row`].
    pub fn enrich(rows: &[AssembledMetrics]) -> Result<Vec<ProductMetrics>, MetricsError> {
        rows.iter().map(Self::enrich_row).collect()
    }

    /// Enriches a single row.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if a delta or growth rate cannot be
    /// represented.
    pub fn enrich_row(row: &AssembledMetrics) -> Result<ProductMetrics, MetricsError> {
        let overflow = || MetricsError::overflow(&row.product_name, "deltas");
        let sales_delta = |a: Decimal, b: Decimal| a.checked_sub(b).ok_or_else(overflow);
        let qty_delta = |a: i64, b: i64| a.checked_sub(b).ok_or_else(overflow);
        let growth = |a: Decimal, b: Decimal| {
            Self::growth_pct(a, b)
                .ok_or_else(|| MetricsError::overflow(&row.product_name, "growth"))
        };

        let delta_ytd_pytd = sales_delta(row.ytd_sales, row.pytd_sales)?;

        Ok(ProductMetrics {
            product_name: row.product_name.clone(),
            ytd_sales: row.ytd_sales,
            ytd_quantity: row.ytd_quantity,
            pytd_sales: row.pytd_sales,
            pytd_quantity: row.pytd_quantity,
            p1ytd_sales: row.p1ytd_sales,
            p1ytd_quantity: row.p1ytd_quantity,
            as_of_date: row.as_of_date,
            fiscal_year: row.fiscal_year.clone(),
            delta_ytd_pytd,
            delta_ytd_p1ytd: sales_delta(row.ytd_sales, row.p1ytd_sales)?,
            delta_pytd_p1ytd: sales_delta(row.pytd_sales, row.p1ytd_sales)?,
            growth_ytd_vs_pytd_pct: growth(row.ytd_sales, row.pytd_sales)?,
            growth_ytd_vs_p1ytd_pct: growth(row.ytd_sales, row.p1ytd_sales)?,
            qty_delta_ytd_pytd: qty_delta(row.ytd_quantity, row.pytd_quantity)?,
            qty_delta_ytd_p1ytd: qty_delta(row.ytd_quantity, row.p1ytd_quantity)?,
            abs_delta_ytd_pytd: delta_ytd_pytd.abs(),
            performance: Performance::classify(delta_ytd_pytd),
        })
    }

    /// Percentage growth of `current` over `base`: `(current - base) / base * 100`.
    ///
    /// The value is kept at full `Decimal` precision; rounding is left to
    /// whoever displays it. A zero base yields zero and a negative base is
    /// divided through as is. Returns `None` if the result is not
    /// representable.
    #[must_use]
    pub fn growth_pct(current: Decimal, base: Decimal) -> Option<Decimal> {
        if base.is_zero() {
            return Some(Decimal::ZERO);
        }

        current
            .checked_sub(base)?
            .checked_div(base)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}
