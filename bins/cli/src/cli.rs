//! Command-line parsing.
//!
//! Flags override the matching `AppConfig` values; anything left unset falls
//! back to the config files and `YTD__*` environment variables.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ytd_core::metrics::MetricsOptions;
use ytd_shared::config::ReportConfig;
use ytd_shared::types::{ShiftPolicy, UnmappedCategoryPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ytd", version, about = "Fiscal YTD / PYTD / P1YTD sales metrics")]
pub struct Cli {
    /// Sales CSV with `date,product_name,sales_amount,quantity` columns.
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-product YTD, PYTD and P1YTD metrics with growth and top movers.
    Metrics(MetricsArgs),
    /// Monthly sales per product.
    Trends(TrendsArgs),
    /// YTD metrics rolled up by product category.
    Categories(CategoryArgs),
}

/// Options shared by every windowed report.
#[derive(Debug, Args, Clone, Default)]
pub struct WindowArgs {
    /// As-of date (YYYY-MM-DD). Defaults to the latest sale in the input.
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// How prior-year windows are derived: `fixed_days` or `fiscal_years`.
    #[arg(long)]
    pub shift_policy: Option<ShiftPolicy>,
}

impl WindowArgs {
    /// Merges the flags over the configured report settings.
    #[must_use]
    pub fn options(&self, report: &ReportConfig) -> MetricsOptions {
        MetricsOptions {
            as_of_date: self.as_of.or(report.as_of_date),
            shift_policy: self.shift_policy.unwrap_or(report.shift_policy),
        }
    }
}

/// Options for `ytd metrics`.
#[derive(Debug, Args, Clone, Default)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Number of top movers to show on each side.
    #[arg(long)]
    pub top: Option<usize>,

    /// Order rows by YTD vs PYTD growth, lowest first, instead of by key.
    #[arg(long)]
    pub ranked: bool,

    /// Write the metrics table to a `.csv` or `.json` file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `ytd trends`.
#[derive(Debug, Args, Clone, Default)]
pub struct TrendsArgs {
    /// Restrict to a product; repeat for several.
    #[arg(short, long = "product")]
    pub products: Vec<String>,

    /// Show a product × month matrix instead of one row per month and product.
    #[arg(long)]
    pub pivot: bool,

    /// Write the trend table to a `.csv` or `.json` file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `ytd categories`.
#[derive(Debug, Args, Clone, Default)]
pub struct CategoryArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Two-column `product_name,category` CSV.
    #[arg(short, long)]
    pub category_map: Option<PathBuf>,

    /// Unmapped products: `drop` them or `bucket` them as Uncategorized.
    #[arg(long)]
    pub unmapped: Option<UnmappedCategoryPolicy>,

    /// Write the category table to a `.csv` or `.json` file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
