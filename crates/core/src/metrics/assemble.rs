//! Full outer join of the three window summaries.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::fiscal::{ComparisonPeriod, fiscal_year_of};

use super::error::MetricsError;
use super::types::{AssembledMetrics, PeriodTotals, ProductPeriodSummary};

/// Joins YTD, PYTD and P1YTD summaries into one row per key.
pub struct MetricsAssembler;

impl MetricsAssembler {
    /// Full outer join on the grouping key.
    ///
    /// The result holds the union of keys across all three inputs. A key
    /// missing from a window gets zero sales and zero quantity for it. The
    /// as-of date and its fiscal year label are attached to every row.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if a window table repeats a key and
    /// its totals overflow when merged.
    pub fn assemble(
        ytd: &[ProductPeriodSummary],
        pytd: &[ProductPeriodSummary],
        p1ytd: &[ProductPeriodSummary],
        as_of: NaiveDate,
    ) -> Result<Vec<AssembledMetrics>, MetricsError> {
        let fiscal_year = fiscal_year_of(as_of).label();

        Ok(Self::outer_join([ytd, pytd, p1ytd])?
            .into_iter()
            .map(|(key, [y, p, p1])| AssembledMetrics {
                product_name: key,
                ytd_sales: y.sales,
                ytd_quantity: y.quantity,
                pytd_sales: p.sales,
                pytd_quantity: p.quantity,
                p1ytd_sales: p1.sales,
                p1ytd_quantity: p1.quantity,
                as_of_date: as_of,
                fiscal_year: fiscal_year.clone(),
            })
            .collect())
    }

    /// Joins per-period tables on their key, one slot per [`ComparisonPeriod`].
    ///
    /// Slots are indexed in `ComparisonPeriod::ALL` order and default to zero.
    /// A key repeated within one table is summed into its slot.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` if summing a repeated key overflows.
    pub fn outer_join(
        tables: [&[ProductPeriodSummary]; 3],
    ) -> Result<BTreeMap<String, [PeriodTotals; 3]>, MetricsError> {
        let mut joined: BTreeMap<String, [PeriodTotals; 3]> = BTreeMap::new();

        for (slot, table) in ComparisonPeriod::ALL.iter().zip(tables) {
            let idx = slot.years_back() as usize;
            for row in table {
                let slot_totals = &mut joined.entry(row.product_name.clone()).or_default()[idx];
                *slot_totals = slot_totals
                    .checked_add(row.period_sales_total, row.period_quantity_total)
                    .ok_or_else(|| MetricsError::overflow(&row.product_name, "outer join"))?;
            }
        }

        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn summary(name: &str, sales: Decimal, qty: i64) -> ProductPeriodSummary {
        ProductPeriodSummary {
            product_name: name.to_string(),
            period_sales_total: sales,
            period_quantity_total: qty,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_missing_windows_are_zero_filled() {
        let ytd = vec![summary("A", dec!(100), 1), summary("B", dec!(50), 2)];
        let pytd = vec![summary("A", dec!(80), 1), summary("C", dec!(30), 3)];
        let p1ytd = vec![summary("D", dec!(10), 4)];

        let rows = MetricsAssembler::assemble(&ytd, &pytd, &p1ytd, as_of()).unwrap();

        let names: Vec<_> = rows.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);

        let c = &rows[2];
        assert_eq!(c.ytd_sales, Decimal::ZERO);
        assert_eq!(c.ytd_quantity, 0);
        assert_eq!(c.pytd_sales, dec!(30));
        assert_eq!(c.pytd_quantity, 3);
        assert_eq!(c.p1ytd_sales, Decimal::ZERO);

        let d = &rows[3];
        assert_eq!(d.p1ytd_sales, dec!(10));
        assert_eq!(d.p1ytd_quantity, 4);
    }

    #[test]
    fn test_metadata_attached_to_every_row() {
        let ytd = vec![summary("A", dec!(1), 1)];
        let pytd = vec![summary("B", dec!(1), 1)];

        let rows = MetricsAssembler::assemble(&ytd, &pytd, &[], as_of()).unwrap();

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.as_of_date, as_of());
            assert_eq!(row.fiscal_year, "FY 2023-24");
        }
    }

    #[test]
    fn test_all_empty_inputs() {
        assert!(MetricsAssembler::assemble(&[], &[], &[], as_of()).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_key_is_merged_into_its_slot() {
        let pytd = vec![summary("A", dec!(2), 1), summary("A", dec!(3), 4)];

        let joined = MetricsAssembler::outer_join([&[], pytd.as_slice(), &[]]).unwrap();

        assert_eq!(joined["A"][1].sales, dec!(5));
        assert_eq!(joined["A"][1].quantity, 5);
        assert_eq!(joined["A"][0], PeriodTotals::default());
    }

    #[test]
    fn test_repeated_key_overflow_is_an_error() {
        let ytd = vec![summary("A", Decimal::MAX, 1), summary("A", Decimal::MAX, 1)];

        let result = MetricsAssembler::assemble(&ytd, &[], &[], as_of());

        assert_eq!(result, Err(MetricsError::overflow("A", "outer join")));
    }
}
