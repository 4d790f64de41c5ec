//! Property-based and scenario tests for the metrics pipeline.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use ytd_shared::types::ShiftPolicy;

use super::aggregate::PeriodAggregator;
use super::assemble::MetricsAssembler;
use super::delta::DeltaCalculator;
use super::error::MetricsError;
use super::service::{MetricsOptions, MetricsService};
use super::types::{GroupBy, Performance, ProductPeriodSummary};
use crate::fiscal::PeriodWindow;
use crate::sales::SalesRecord;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Records from the reference scenario: A sells in all three years, B only now.
fn scenario_records() -> Vec<SalesRecord> {
    vec![
        SalesRecord::new(date(2023, 4, 10), "A", dec!(100), 1),
        SalesRecord::new(date(2023, 4, 10), "B", dec!(50), 2),
        SalesRecord::new(date(2022, 4, 10), "A", dec!(80), 1),
        SalesRecord::new(date(2021, 4, 10), "A", dec!(40), 1),
    ]
}

#[test]
fn test_reference_scenario() {
    let options = MetricsOptions {
        as_of_date: Some(date(2023, 4, 10)),
        shift_policy: ShiftPolicy::FixedDays,
    };

    let report = MetricsService::calculate(&scenario_records(), &options).unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.group_by, GroupBy::Product);
    assert_eq!(report.fiscal_year().label(), "FY 2023-24");

    let a = report.find("A").unwrap();
    assert_eq!(a.ytd_sales, dec!(100));
    assert_eq!(a.pytd_sales, dec!(80));
    assert_eq!(a.p1ytd_sales, dec!(40));
    assert_eq!(a.delta_ytd_pytd, dec!(20));
    assert_eq!(a.delta_ytd_p1ytd, dec!(60));
    assert_eq!(a.delta_pytd_p1ytd, dec!(40));
    assert_eq!(a.growth_ytd_vs_pytd_pct, dec!(25.0));
    assert_eq!(a.growth_ytd_vs_p1ytd_pct, dec!(150));
    assert_eq!(a.performance, Performance::Growing);
    assert_eq!(a.as_of_date, date(2023, 4, 10));
    assert_eq!(a.fiscal_year, "FY 2023-24");

    let b = report.find("B").unwrap();
    assert_eq!(b.ytd_sales, dec!(50));
    assert_eq!(b.ytd_quantity, 2);
    assert_eq!(b.pytd_sales, Decimal::ZERO);
    assert_eq!(b.p1ytd_sales, Decimal::ZERO);
    assert_eq!(b.growth_ytd_vs_pytd_pct, Decimal::ZERO);
    assert_eq!(b.growth_ytd_vs_p1ytd_pct, Decimal::ZERO);
    assert_eq!(b.performance, Performance::Growing);
}

#[test]
fn test_as_of_defaults_to_latest_record() {
    let report = MetricsService::calculate(&scenario_records(), &MetricsOptions::default()).unwrap();
    assert_eq!(report.as_of_date(), date(2023, 4, 10));
}

#[test]
fn test_empty_records_without_as_of_is_an_error() {
    let result = MetricsService::calculate(&[], &MetricsOptions::default());
    assert!(matches!(result, Err(MetricsError::NoRecords)));
}

#[test]
fn test_empty_records_with_as_of_yields_empty_report() {
    let options = MetricsOptions {
        as_of_date: Some(date(2023, 4, 10)),
        ..MetricsOptions::default()
    };
    let report = MetricsService::calculate(&[], &options).unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.summary().unwrap().row_count, 0);
}

#[test]
fn test_summary_totals_and_counts() {
    let mut records = scenario_records();
    records.push(SalesRecord::new(date(2022, 4, 5), "C", dec!(30), 3));
    records.push(SalesRecord::new(date(2023, 4, 5), "D", dec!(5), 1));
    records.push(SalesRecord::new(date(2022, 4, 5), "D", dec!(5), 1));

    let report = MetricsService::calculate(&records, &MetricsOptions::default()).unwrap();
    let summary = report.summary().unwrap();

    assert_eq!(summary.row_count, 4);
    assert_eq!(summary.ytd_sales, dec!(155));
    assert_eq!(summary.pytd_sales, dec!(115));
    assert_eq!(summary.p1ytd_sales, dec!(40));
    assert_eq!(summary.ytd_quantity, 4);
    assert_eq!(summary.delta_ytd_pytd, dec!(40));
    assert_eq!(summary.growth_ytd_vs_pytd_pct, dec!(40) / dec!(115) * dec!(100));
    assert_eq!(summary.growth_ytd_vs_pytd_pct.round_dp(2), dec!(34.78));
    assert_eq!(summary.growing, 2);
    assert_eq!(summary.declining, 1);
    assert_eq!(summary.stable, 1);
}

#[test]
fn test_window_total_overflow_surfaces_from_calculate() {
    let records = vec![
        SalesRecord::new(date(2023, 4, 10), "A", Decimal::MAX, 1),
        SalesRecord::new(date(2023, 4, 9), "A", Decimal::MAX, 1),
    ];

    let result = MetricsService::calculate(&records, &MetricsOptions::default());

    assert_eq!(result, Err(MetricsError::overflow("A", "window totals")));
}

#[test]
fn test_summary_overflow_is_an_error() {
    let records = vec![
        SalesRecord::new(date(2023, 4, 10), "A", Decimal::MAX, 1),
        SalesRecord::new(date(2023, 4, 10), "B", Decimal::MAX, 1),
    ];

    let report = MetricsService::calculate(&records, &MetricsOptions::default()).unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.summary(), Err(MetricsError::overflow("all rows", "summary")));
}

#[test]
fn test_ranking_and_top_movers() {
    let mut records = scenario_records();
    records.push(SalesRecord::new(date(2022, 4, 5), "C", dec!(30), 3));
    records.push(SalesRecord::new(date(2023, 4, 5), "E", dec!(10), 1));
    records.push(SalesRecord::new(date(2022, 4, 5), "E", dec!(20), 1));

    let report = MetricsService::calculate(&records, &MetricsOptions::default()).unwrap();

    let ranked: Vec<_> = report
        .ranked_by_growth()
        .iter()
        .map(|r| r.product_name.as_str())
        .collect();
    // C: -100%, E: -50%, B: 0% (zero base), A: 25%
    assert_eq!(ranked, vec!["C", "E", "B", "A"]);

    let movers = report.top_movers(1);
    assert_eq!(movers.growing.len(), 1);
    assert_eq!(movers.growing[0].product_name, "B");
    assert_eq!(movers.declining.len(), 1);
    assert_eq!(movers.declining[0].product_name, "C");
}

#[test]
fn test_input_records_are_not_modified() {
    let records = scenario_records();
    let snapshot = records.clone();
    let _ = MetricsService::calculate(&records, &MetricsOptions::default()).unwrap();
    assert_eq!(records, snapshot);
}

// ============================================================================
// Properties
// ============================================================================

fn record_strategy() -> impl Strategy<Value = SalesRecord> {
    (
        0i64..60,
        prop::sample::select(vec!["A", "B", "C", "D"]),
        0i64..1_000_000,
        0i64..50,
    )
        .prop_map(|(offset, name, cents, qty)| {
            SalesRecord::new(
                date(2023, 4, 1) + chrono::Days::new(offset.unsigned_abs()),
                name,
                Decimal::new(cents, 2),
                qty,
            )
        })
}

fn summary_strategy() -> impl Strategy<Value = Vec<ProductPeriodSummary>> {
    prop::collection::btree_map(
        prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]),
        (0i64..1_000_000, 0i64..100),
        0..6,
    )
    .prop_map(|m| {
        m.into_iter()
            .map(|(name, (cents, qty))| ProductPeriodSummary {
                product_name: name.to_string(),
                period_sales_total: Decimal::new(cents, 2),
                period_quantity_total: qty,
            })
            .collect()
    })
}

fn totals_by_name(rows: &[ProductPeriodSummary]) -> BTreeMap<String, (Decimal, i64)> {
    rows.iter()
        .map(|r| {
            (
                r.product_name.clone(),
                (r.period_sales_total, r.period_quantity_total),
            )
        })
        .collect()
}

fn names(rows: &[ProductPeriodSummary]) -> BTreeSet<String> {
    rows.iter().map(|r| r.product_name.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Aggregating two disjoint record sets separately and adding the results
    /// equals aggregating their union.
    #[test]
    fn prop_aggregation_is_additive(
        left in prop::collection::vec(record_strategy(), 0..30),
        right in prop::collection::vec(record_strategy(), 0..30),
    ) {
        let window = PeriodWindow::new(date(2023, 4, 10), date(2023, 5, 20));

        let mut combined = totals_by_name(&PeriodAggregator::aggregate(&left, &window).unwrap());
        for (name, (sales, qty)) in totals_by_name(&PeriodAggregator::aggregate(&right, &window).unwrap()) {
            let entry = combined.entry(name).or_insert((Decimal::ZERO, 0));
            entry.0 += sales;
            entry.1 += qty;
        }

        let union: Vec<SalesRecord> = left.iter().chain(right.iter()).cloned().collect();
        let expected = totals_by_name(&PeriodAggregator::aggregate(&union, &window).unwrap());

        prop_assert_eq!(combined, expected);
    }

    /// Only records inside the window contribute to the totals.
    #[test]
    fn prop_aggregation_respects_window(
        records in prop::collection::vec(record_strategy(), 0..40),
    ) {
        let window = PeriodWindow::new(date(2023, 4, 15), date(2023, 5, 15));
        let expected: Decimal = records
            .iter()
            .filter(|r| window.contains(r.date))
            .map(|r| r.sales_amount)
            .sum();

        let total: Decimal = PeriodAggregator::aggregate(&records, &window)
            .unwrap()
            .iter()
            .map(|s| s.period_sales_total)
            .sum();

        prop_assert_eq!(total, expected);
    }

    /// The joined key set is the union of the input key sets, and swapping
    /// the inputs only swaps the period columns.
    #[test]
    fn prop_outer_join_is_union_and_order_independent(
        ytd in summary_strategy(),
        pytd in summary_strategy(),
        p1ytd in summary_strategy(),
    ) {
        let as_of = date(2023, 10, 1);
        let rows = MetricsAssembler::assemble(&ytd, &pytd, &p1ytd, as_of).unwrap();
        let swapped = MetricsAssembler::assemble(&pytd, &ytd, &p1ytd, as_of).unwrap();

        let mut expected = names(&ytd);
        expected.extend(names(&pytd));
        expected.extend(names(&p1ytd));

        let got: BTreeSet<String> = rows.iter().map(|r| r.product_name.clone()).collect();
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(rows.len(), expected.len());

        for (row, other) in rows.iter().zip(swapped.iter()) {
            prop_assert_eq!(&row.product_name, &other.product_name);
            prop_assert_eq!(row.ytd_sales, other.pytd_sales);
            prop_assert_eq!(row.pytd_sales, other.ytd_sales);
            prop_assert_eq!(row.p1ytd_quantity, other.p1ytd_quantity);
        }
    }

    /// Growth against a zero base is exactly zero for any current value.
    #[test]
    fn prop_growth_with_zero_base_is_zero(current in -1_000_000_000i64..1_000_000_000) {
        prop_assert_eq!(
            DeltaCalculator::growth_pct(Decimal::new(current, 2), Decimal::ZERO),
            Some(Decimal::ZERO)
        );
    }

    /// Growth against a non-zero base is exactly (current - base) / base * 100,
    /// with no rounding.
    #[test]
    fn prop_growth_formula(current in 0i64..1_000_000_000, base in 1i64..1_000_000_000) {
        let current = Decimal::from(current);
        let base = Decimal::from(base);
        let expected = (current - base) / base * dec!(100);
        prop_assert_eq!(DeltaCalculator::growth_pct(current, base), Some(expected));
    }

    /// Every row carries exactly one performance label, matching the delta sign.
    #[test]
    fn prop_performance_partitions_rows(
        records in prop::collection::vec(record_strategy(), 0..40),
        prior in prop::collection::vec(record_strategy(), 0..40),
    ) {
        let shifted: Vec<SalesRecord> = prior
            .into_iter()
            .map(|r| SalesRecord { date: r.date - chrono::Days::new(365), ..r })
            .collect();
        let all: Vec<SalesRecord> = records.into_iter().chain(shifted).collect();

        let report = MetricsService::calculate_as_of(
            &all,
            date(2023, 6, 30),
            ShiftPolicy::FixedDays,
            GroupBy::Product,
        )
        .unwrap();
        let summary = report.summary().unwrap();

        prop_assert_eq!(summary.growing + summary.declining + summary.stable, report.rows.len());
        for row in &report.rows {
            let expected = if row.delta_ytd_pytd > Decimal::ZERO {
                Performance::Growing
            } else if row.delta_ytd_pytd < Decimal::ZERO {
                Performance::Declining
            } else {
                Performance::Stable
            };
            prop_assert_eq!(row.performance, expected);
            prop_assert_eq!(row.abs_delta_ytd_pytd, row.delta_ytd_pytd.abs());
        }
    }
}
