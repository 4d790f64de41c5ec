//! Metrics pipeline service.

use chrono::NaiveDate;
use tracing::{debug, info};
use ytd_shared::types::ShiftPolicy;

use crate::fiscal::{ComparisonPeriod, PeriodWindows};
use crate::sales::{SalesRecord, latest_date};

use super::aggregate::PeriodAggregator;
use super::assemble::MetricsAssembler;
use super::delta::DeltaCalculator;
use super::error::MetricsError;
use super::report::MetricsReport;
use super::types::GroupBy;

/// Options for a metrics run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsOptions {
    /// As-of date. Defaults to the latest record date.
    pub as_of_date: Option<NaiveDate>,
    /// How prior-year windows are derived.
    pub shift_policy: ShiftPolicy,
}

impl MetricsOptions {
    /// Resolves the as-of date against `records`.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::NoRecords` when no date is set and `records` is
    /// empty.
    pub fn resolve_as_of(&self, records: &[SalesRecord]) -> Result<NaiveDate, MetricsError> {
        self.as_of_date
            .or_else(|| latest_date(records))
            .ok_or(MetricsError::NoRecords)
    }
}

/// Runs the aggregate → assemble → enrich pipeline.
pub struct MetricsService;

impl MetricsService {
    /// Calculates per-product YTD, PYTD and P1YTD metrics.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::NoRecords` when no as-of date is given and
    /// `records` is empty, and `MetricsError::Overflow` when a total or
    /// delta does not fit.
    pub fn calculate(
        records: &[SalesRecord],
        options: &MetricsOptions,
    ) -> Result<MetricsReport, MetricsError> {
        let as_of = options.resolve_as_of(records)?;
        Self::calculate_as_of(records, as_of, options.shift_policy, GroupBy::Product)
    }

    /// Calculates metrics for a fixed as-of date.
    ///
    /// `records` must already carry the grouping key in `product_name`.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::Overflow` when a window total, a delta or a
    /// growth rate does not fit in its type.
    pub fn calculate_as_of(
        records: &[SalesRecord],
        as_of: NaiveDate,
        shift_policy: ShiftPolicy,
        group_by: GroupBy,
    ) -> Result<MetricsReport, MetricsError> {
        let windows = PeriodWindows::resolve(as_of, shift_policy);

        info!(
            as_of = %as_of.format("%Y-%m-%d"),
            fiscal_year = %windows.fiscal_year,
            ytd = %windows.ytd,
            pytd = %windows.pytd,
            p1ytd = %windows.p1ytd,
            shift_policy = %shift_policy,
            "Calculating metrics"
        );

        let [ytd, pytd, p1ytd] = ComparisonPeriod::ALL.map(|period| {
            let summary = PeriodAggregator::aggregate(records, &windows.window(period));
            if let Ok(summary) = &summary {
                debug!(period = period.label(), keys = summary.len(), "Aggregated window");
            }
            summary
        });

        let assembled = MetricsAssembler::assemble(&ytd?, &pytd?, &p1ytd?, as_of)?;
        let rows = DeltaCalculator::enrich(&assembled)?;

        info!(
            rows = rows.len(),
            group_by = group_by.key_column(),
            "Metrics calculated"
        );

        Ok(MetricsReport {
            group_by,
            windows,
            rows,
        })
    }
}
