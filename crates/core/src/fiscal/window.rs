//! Comparison windows: YTD, PYTD and P1YTD.
//!
//! The YTD window runs from the start of the fiscal year containing the as-of
//! date up to the as-of date. The prior-year windows are the YTD window moved
//! back by one and two years according to a [`ShiftPolicy`].

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ytd_shared::types::ShiftPolicy;

use super::calendar::{FiscalYear, fiscal_year_of};

/// Days subtracted from the YTD bounds to obtain the PYTD window.
pub const PYTD_SHIFT_DAYS: u64 = 365;

/// Days subtracted from the YTD bounds to obtain the P1YTD window.
pub const P1YTD_SHIFT_DAYS: u64 = 730;

/// A date range with both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
}

impl PeriodWindow {
    /// Creates a window from its inclusive bounds.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if `date` lies within the window, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, bounds included.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Moves both bounds back by a fixed number of days.
    #[must_use]
    pub fn shifted_back_days(&self, days: u64) -> Self {
        let shift = |d: NaiveDate| d.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self::new(shift(self.start), shift(self.end))
    }

    /// Moves both bounds back by whole calendar years.
    ///
    /// Month arithmetic clamps February 29 onto February 28.
    #[must_use]
    pub fn shifted_back_years(&self, years: u32) -> Self {
        let shift = |d: NaiveDate| {
            d.checked_sub_months(Months::new(years * 12))
                .unwrap_or(NaiveDate::MIN)
        };
        Self::new(shift(self.start), shift(self.end))
    }
}

impl std::fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// The three periods compared by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonPeriod {
    /// Current fiscal year to date.
    Ytd,
    /// Same window one year earlier.
    Pytd,
    /// Same window two years earlier.
    P1ytd,
}

impl ComparisonPeriod {
    /// All periods, most recent first.
    pub const ALL: [Self; 3] = [Self::Ytd, Self::Pytd, Self::P1ytd];

    /// Short display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ytd => "YTD",
            Self::Pytd => "PYTD",
            Self::P1ytd => "P1YTD",
        }
    }

    /// How many years this period lies behind the current one.
    #[must_use]
    pub const fn years_back(&self) -> u32 {
        match self {
            Self::Ytd => 0,
            Self::Pytd => 1,
            Self::P1ytd => 2,
        }
    }
}

/// Returns the YTD window for `as_of`: fiscal year start through `as_of`.
#[must_use]
pub fn ytd_window(as_of: NaiveDate) -> PeriodWindow {
    PeriodWindow::new(fiscal_year_of(as_of).start_date(), as_of)
}

/// Returns the PYTD window: the YTD window moved back exactly 365 days.
#[must_use]
pub fn pytd_window(ytd: &PeriodWindow) -> PeriodWindow {
    ytd.shifted_back_days(PYTD_SHIFT_DAYS)
}

/// Returns the P1YTD window: the YTD window moved back exactly 730 days.
#[must_use]
pub fn p1ytd_window(ytd: &PeriodWindow) -> PeriodWindow {
    ytd.shifted_back_days(P1YTD_SHIFT_DAYS)
}

/// All comparison windows resolved from one as-of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindows {
    /// The as-of date every window was derived from.
    pub as_of_date: NaiveDate,
    /// Fiscal year containing the as-of date.
    pub fiscal_year: FiscalYear,
    /// Policy used for the prior-year shifts.
    pub shift_policy: ShiftPolicy,
    /// Current year-to-date window.
    pub ytd: PeriodWindow,
    /// Previous year-to-date window.
    pub pytd: PeriodWindow,
    /// Two-years-prior year-to-date window.
    pub p1ytd: PeriodWindow,
}

impl PeriodWindows {
    /// Resolves the YTD, PYTD and P1YTD windows for `as_of`.
    #[must_use]
    pub fn resolve(as_of: NaiveDate, shift_policy: ShiftPolicy) -> Self {
        let ytd = ytd_window(as_of);
        let (pytd, p1ytd) = match shift_policy {
            ShiftPolicy::FixedDays => (pytd_window(&ytd), p1ytd_window(&ytd)),
            ShiftPolicy::FiscalYears => (ytd.shifted_back_years(1), ytd.shifted_back_years(2)),
        };

        Self {
            as_of_date: as_of,
            fiscal_year: fiscal_year_of(as_of),
            shift_policy,
            ytd,
            pytd,
            p1ytd,
        }
    }

    /// Returns the window for one comparison period.
    #[must_use]
    pub const fn window(&self, period: ComparisonPeriod) -> PeriodWindow {
        match period {
            ComparisonPeriod::Ytd => self.ytd,
            ComparisonPeriod::Pytd => self.pytd,
            ComparisonPeriod::P1ytd => self.p1ytd,
        }
    }

    /// Iterates over `(period, window)` pairs, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = (ComparisonPeriod, PeriodWindow)> + '_ {
        ComparisonPeriod::ALL
            .into_iter()
            .map(|period| (period, self.window(period)))
    }
}
