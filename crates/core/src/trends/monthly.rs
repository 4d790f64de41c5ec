//! Monthly sales trends per product.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fiscal::{FiscalYear, fiscal_year_of};
use crate::metrics::{MetricsError, PeriodTotals};
use crate::sales::SalesRecord;

/// Sales of one product in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// First day of the calendar month.
    pub year_month: NaiveDate,
    /// Fiscal year label the month belongs to.
    pub fiscal_year: String,
    /// Product sold.
    pub product_name: String,
    /// Sum of sales amounts in the month.
    pub sales_amount: Decimal,
    /// Sum of quantities in the month.
    pub quantity: i64,
}

/// Product × month sales matrix, missing cells filled with zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPivot {
    /// Column headers, chronological.
    pub months: Vec<NaiveDate>,
    /// Row headers, sorted by name.
    pub products: Vec<String>,
    /// `values[row][column]` holds the sales of `products[row]` in `months[column]`.
    pub values: Vec<Vec<Decimal>>,
}

impl MonthlyPivot {
    /// Returns the cell for a product and month.
    #[must_use]
    pub fn value(&self, product: &str, month: NaiveDate) -> Option<Decimal> {
        let row = self.products.iter().position(|p| p == product)?;
        let col = self.months.binary_search(&month).ok()?;
        Some(self.values[row][col])
    }
}

/// Truncates a date to the first day of its month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Groups the sales log by calendar month and product.
pub struct MonthlyTrendAggregator;

impl MonthlyTrendAggregator {
    /// Sums sales and quantity per month and product.
    ///
    /// The fiscal year comes from each record's own date. Rows are ordered by
    /// month, then product.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if a monthly total overflows.
    pub fn monthly_trends(records: &[SalesRecord]) -> Result<Vec<MonthlyTrend>, MetricsError> {
        Self::aggregate(records.iter())
    }

    /// Like [`Self::monthly_trends`], restricted to the given products.
    ///
    /// An empty product list keeps every product.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if a monthly total overflows.
    pub fn monthly_trends_for(
        records: &[SalesRecord],
        products: &[String],
    ) -> Result<Vec<MonthlyTrend>, MetricsError> {
        if products.is_empty() {
            return Self::monthly_trends(records);
        }
        Self::aggregate(
            records
                .iter()
                .filter(|r| products.iter().any(|p| *p == r.product_name)),
        )
    }

    /// Pivots trend rows into a product × month matrix.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if rows sharing a cell overflow when
    /// summed.
    pub fn pivot(trends: &[MonthlyTrend]) -> Result<MonthlyPivot, MetricsError> {
        let months: Vec<NaiveDate> = trends
            .iter()
            .map(|t| t.year_month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let products: Vec<String> = trends
            .iter()
            .map(|t| t.product_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut values = vec![vec![Decimal::ZERO; months.len()]; products.len()];
        for trend in trends {
            if let (Ok(row), Ok(col)) = (
                products.binary_search(&trend.product_name),
                months.binary_search(&trend.year_month),
            ) {
                let cell = &mut values[row][col];
                *cell = cell
                    .checked_add(trend.sales_amount)
                    .ok_or_else(|| MetricsError::overflow(&trend.product_name, "pivot"))?;
            }
        }

        Ok(MonthlyPivot {
            months,
            products,
            values,
        })
    }

    fn aggregate<'a>(
        records: impl Iterator<Item = &'a SalesRecord>,
    ) -> Result<Vec<MonthlyTrend>, MetricsError> {
        let mut totals: BTreeMap<(NaiveDate, FiscalYear, &str), PeriodTotals> = BTreeMap::new();

        for record in records {
            let entry = totals
                .entry((
                    month_start(record.date),
                    fiscal_year_of(record.date),
                    record.product_name.as_str(),
                ))
                .or_default();
            *entry = entry
                .checked_add(record.sales_amount, record.quantity)
                .ok_or_else(|| MetricsError::overflow(&record.product_name, "monthly totals"))?;
        }

        Ok(totals
            .into_iter()
            .map(|((year_month, fiscal_year, product), t)| MonthlyTrend {
                year_month,
                fiscal_year: fiscal_year.label(),
                product_name: product.to_string(),
                sales_amount: t.sales,
                quantity: t.quantity,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records() -> Vec<SalesRecord> {
        vec![
            SalesRecord::new(date(2024, 3, 5), "A", dec!(10), 1),
            SalesRecord::new(date(2024, 3, 28), "A", dec!(15), 2),
            SalesRecord::new(date(2024, 4, 2), "A", dec!(7), 1),
            SalesRecord::new(date(2024, 3, 9), "B", dec!(3), 4),
        ]
    }

    #[test]
    fn test_same_month_same_product_sums_into_one_row() {
        let trends = MonthlyTrendAggregator::monthly_trends(&records()).unwrap();

        assert_eq!(trends.len(), 3);
        let march_a = &trends[0];
        assert_eq!(march_a.year_month, date(2024, 3, 1));
        assert_eq!(march_a.product_name, "A");
        assert_eq!(march_a.sales_amount, dec!(25));
        assert_eq!(march_a.quantity, 3);
    }

    #[test]
    fn test_different_months_stay_separate_with_own_fiscal_year() {
        let trends = MonthlyTrendAggregator::monthly_trends(&records()).unwrap();

        let a_rows: Vec<_> = trends.iter().filter(|t| t.product_name == "A").collect();
        assert_eq!(a_rows.len(), 2);
        assert_eq!(a_rows[0].fiscal_year, "FY 2023-24");
        assert_eq!(a_rows[1].year_month, date(2024, 4, 1));
        assert_eq!(a_rows[1].fiscal_year, "FY 2024-25");
    }

    #[test]
    fn test_product_filter() {
        let only_b = MonthlyTrendAggregator::monthly_trends_for(&records(), &["B".to_string()]).unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].product_name, "B");

        let all = MonthlyTrendAggregator::monthly_trends_for(&records(), &[]).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_pivot_fills_missing_cells_with_zero() {
        let trends = MonthlyTrendAggregator::monthly_trends(&records()).unwrap();
        let pivot = MonthlyTrendAggregator::pivot(&trends).unwrap();

        assert_eq!(pivot.products, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(pivot.months, vec![date(2024, 3, 1), date(2024, 4, 1)]);
        assert_eq!(pivot.value("A", date(2024, 3, 1)), Some(dec!(25)));
        assert_eq!(pivot.value("B", date(2024, 4, 1)), Some(Decimal::ZERO));
        assert_eq!(pivot.value("C", date(2024, 4, 1)), None);
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn test_monthly_total_overflow_is_an_error() {
        let records = vec![
            SalesRecord::new(date(2024, 3, 5), "A", Decimal::MAX, 1),
            SalesRecord::new(date(2024, 3, 6), "A", Decimal::MAX, 1),
        ];

        let result = MonthlyTrendAggregator::monthly_trends(&records);

        assert_eq!(result, Err(MetricsError::overflow("A", "monthly totals")));
    }

    #[test]
    fn test_pivot_overflow_is_an_error() {
        let trend = MonthlyTrend {
            year_month: date(2024, 3, 1),
            fiscal_year: "FY 2023-24".to_string(),
            product_name: "A".to_string(),
            sales_amount: Decimal::MAX,
            quantity: 1,
        };

        let result = MonthlyTrendAggregator::pivot(&[trend.clone(), trend]);

        assert_eq!(result, Err(MetricsError::overflow("A", "pivot")));
    }
}
