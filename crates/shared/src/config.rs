//! Application configuration management.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::types::{ShiftPolicy, UnmappedCategoryPolicy};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Input file locations.
    #[serde(default)]
    pub input: InputConfig,
    /// Report calculation settings.
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input file configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Sales log CSV with `date,product_name,sales_amount,quantity` columns.
    #[serde(default = "default_sales_path")]
    pub sales_path: PathBuf,
    /// Optional `product_name,category` CSV used by the category rollup.
    #[serde(default)]
    pub category_map_path: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sales_path: default_sales_path(),
            category_map_path: None,
        }
    }
}

fn default_sales_path() -> PathBuf {
    PathBuf::from("data/sales.csv")
}

/// Report calculation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Fixed as-of date. When unset the latest record date is used.
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
    /// How prior-year windows are derived.
    #[serde(default)]
    pub shift_policy: ShiftPolicy,
    /// What the category rollup does with unmapped products.
    #[serde(default)]
    pub unmapped_category: UnmappedCategoryPolicy,
    /// Number of top movers to show on each side.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            as_of_date: None,
            shift_policy: ShiftPolicy::default(),
            unmapped_category: UnmappedCategoryPolicy::default(),
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    5
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "ytd=info,ytd_cli=info,ytd_core=info".to_string()
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones winning: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `YTD__SECTION__KEY` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("YTD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if self.report.top_n == 0 {
            return Err(AppError::Config("report.top_n must be at least 1".into()));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(AppError::Config("logging.filter must not be empty".into()));
        }
        Ok(())
    }
}
