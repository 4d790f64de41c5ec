//! Per-window aggregation of the sales log.

use std::collections::BTreeMap;

use crate::fiscal::PeriodWindow;
use crate::sales::SalesRecord;

use super::error::MetricsError;
use super::types::{PeriodTotals, ProductPeriodSummary};

/// Filters records into a window and totals them per product.
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Sums sales and quantity per product for records inside `window`.
    ///
    /// Both window bounds are inclusive. Rows come back in product-name order;
    /// a window without records yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if a product's sales or quantity sum
    /// overflows.
    pub fn aggregate(
        records: &[SalesRecord],
        window: &PeriodWindow,
    ) -> Result<Vec<ProductPeriodSummary>, MetricsError> {
        let mut totals: BTreeMap<&str, PeriodTotals> = BTreeMap::new();

        for record in records.iter().filter(|r| window.contains(r.date)) {
            let entry = totals.entry(record.product_name.as_str()).or_default();
            *entry = entry
                .checked_add(record.sales_amount, record.quantity)
                .ok_or_else(|| MetricsError::overflow(&record.product_name, "window totals"))?;
        }

        Ok(totals
            .into_iter()
            .map(|(name, t)| ProductPeriodSummary {
                product_name: name.to_string(),
                period_sales_total: t.sales,
                period_quantity_total: t.quantity,
            })
            .collect())
    }
}
