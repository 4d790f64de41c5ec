//! Fiscal year and comparison window management.
//!
//! Fiscal years run from April 1 to March 31. The comparison windows (YTD,
//! PYTD, P1YTD) are all resolved from a single as-of date.

pub mod calendar;
pub mod window;

pub use calendar::{FISCAL_YEAR_START_DAY, FISCAL_YEAR_START_MONTH, FiscalYear, fiscal_year_of};
pub use window::{
    ComparisonPeriod, P1YTD_SHIFT_DAYS, PYTD_SHIFT_DAYS, PeriodWindow, PeriodWindows,
    p1ytd_window, pytd_window, ytd_window,
};
