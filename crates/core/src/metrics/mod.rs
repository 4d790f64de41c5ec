//! YTD / PYTD / P1YTD metrics pipeline.
//!
//! The pipeline runs in four stages, each producing a new table:
//! - `aggregate` - per-key totals for one comparison window
//! - `assemble` - full outer join of the three window totals
//! - `delta` - deltas, growth percentages and performance labels
//! - `report` - the assembled result plus summary and ranking helpers
//!
//! `MetricsService` wires the stages together.

pub mod aggregate;
pub mod assemble;
pub mod delta;
pub mod error;
pub mod report;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregate::PeriodAggregator;
pub use assemble::MetricsAssembler;
pub use delta::DeltaCalculator;
pub use error::MetricsError;
pub use report::{KeyedMetrics, MetricsReport, MetricsSummary, TopMovers};
pub use service::{MetricsOptions, MetricsService};
pub use types::{
    AssembledMetrics, GroupBy, PeriodTotals, Performance, ProductMetrics, ProductPeriodSummary,
};
