//! Policies that tune how comparison periods and category rollups behave.
//!
//! Both policies default to the historical behaviour of the metrics engine so
//! that reports stay comparable with earlier runs.

use serde::{Deserialize, Serialize};

/// Label used for records whose product has no category mapping when the
/// [`UnmappedCategoryPolicy::Bucket`] policy is active.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// How the prior-year comparison windows are derived from the YTD window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPolicy {
    /// Shift both bounds back by a fixed 365 days per year.
    ///
    /// Ignores leap days, so a window that spans February 29 drifts by one day.
    #[default]
    FixedDays,
    /// Shift both bounds back by whole calendar years (12 months per year).
    ///
    /// February 29 maps onto February 28 in non-leap years.
    FiscalYears,
}

impl ShiftPolicy {
    /// Returns the config/CLI spelling of this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FixedDays => "fixed_days",
            Self::FiscalYears => "fiscal_years",
        }
    }
}

impl std::fmt::Display for ShiftPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShiftPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed_days" | "fixed-days" | "days" => Ok(Self::FixedDays),
            "fiscal_years" | "fiscal-years" | "years" => Ok(Self::FiscalYears),
            _ => Err(format!("Unknown shift policy: {s}")),
        }
    }
}

/// What the category rollup does with products missing from the category map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedCategoryPolicy {
    /// Exclude the record from the rollup.
    #[default]
    Drop,
    /// Roll the record up under [`UNCATEGORIZED_LABEL`].
    Bucket,
}

impl UnmappedCategoryPolicy {
    /// Returns the string representation of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Bucket => "bucket",
        }
    }
}

impl std::fmt::Display for UnmappedCategoryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UnmappedCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "bucket" | "uncategorized" => Ok(Self::Bucket),
            _ => Err(format!("Unknown unmapped category policy: {s}")),
        }
    }
}
