//! Fiscal calendar: maps calendar dates onto April-to-March fiscal years.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month in which every fiscal year starts (April).
pub const FISCAL_YEAR_START_MONTH: u32 = 4;

/// Day of month on which every fiscal year starts.
pub const FISCAL_YEAR_START_DAY: u32 = 1;

/// A fiscal year, identified by the calendar year it starts in.
///
/// `FiscalYear::from_start_year(2023)` runs from 2023-04-01 to 2024-03-31 and
/// is labelled `"FY 2023-24"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FiscalYear {
    start_year: i32,
}

impl FiscalYear {
    /// Creates the fiscal year starting on April 1 of `start_year`.
    #[must_use]
    pub const fn from_start_year(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Returns the fiscal year that contains `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= FISCAL_YEAR_START_MONTH {
            Self::from_start_year(date.year())
        } else {
            Self::from_start_year(date.year() - 1)
        }
    }

    /// Calendar year in which this fiscal year starts.
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Calendar year in which this fiscal year ends.
    #[must_use]
    pub const fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// First day of the fiscal year (April 1).
    ///
    /// Saturates to `NaiveDate::MIN` outside chrono's representable range.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, FISCAL_YEAR_START_MONTH, FISCAL_YEAR_START_DAY)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the fiscal year (March 31 of the following calendar year).
    ///
    /// Saturates to `NaiveDate::MAX` outside chrono's representable range.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year(), FISCAL_YEAR_START_MONTH, FISCAL_YEAR_START_DAY)
            .and_then(|next_start| next_start.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if `date` falls within this fiscal year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    /// The fiscal year `years` before this one.
    #[must_use]
    pub const fn years_before(&self, years: i32) -> Self {
        Self::from_start_year(self.start_year - years)
    }

    /// Display label, e.g. `"FY 2023-24"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("FY {}-{:02}", self.start_year, self.end_year().rem_euclid(100))
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Returns the fiscal year containing `date`.
#[must_use]
pub fn fiscal_year_of(date: NaiveDate) -> FiscalYear {
    FiscalYear::containing(date)
}
