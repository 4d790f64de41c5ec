//! Secondary aggregations built on the metrics primitives.
//!
//! - `monthly` - sales per calendar month and product, plus a pivot for heatmaps
//! - `category` - YTD metrics rolled up by product category

pub mod category;
pub mod monthly;

pub use category::{CategoryMap, CategoryRollup, RemappedRecords};
pub use monthly::{MonthlyPivot, MonthlyTrend, MonthlyTrendAggregator, month_start};
