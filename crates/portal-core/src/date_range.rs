//! Calendar windows used to parameterize every portal query.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date pattern the portal expects in query strings and form fields.
pub const PORTAL_DATE_FORMAT: &str = "%m/%d/%Y";

/// An inclusive pair of calendar dates.
///
/// `start <= end` is expected but not enforced; use [`DateRange::is_ordered`]
/// where an inverted range should be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The window `[end - days_back, end]`, or `None` when the start falls
    /// before the earliest representable date.
    #[must_use]
    pub fn ending_on(end: NaiveDate, days_back: u32) -> Option<Self> {
        let start = end.checked_sub_days(Days::new(u64::from(days_back)))?;
        Some(Self { start, end })
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Renders both endpoints with a `strftime` pattern.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid `strftime` pattern. Callers pass
    /// compile-time constants.
    #[must_use]
    pub fn format(&self, pattern: &str) -> (String, String) {
        (
            self.start.format(pattern).to_string(),
            self.end.format(pattern).to_string(),
        )
    }

    /// Both endpoints in [`PORTAL_DATE_FORMAT`].
    #[must_use]
    pub fn portal_format(&self) -> (String, String) {
        self.format(PORTAL_DATE_FORMAT)
    }

    /// `MMDDYYYY_MMDDYYYY`, safe for file names.
    #[must_use]
    pub fn compact_label(&self) -> String {
        let (start, end) = self.format("%m%d%Y");
        format!("{start}_{end}")
    }

    /// The same calendar window one year earlier.
    ///
    /// Month and day are kept; Feb 29 has no counterpart in the prior year
    /// and becomes Feb 28.
    #[must_use]
    pub fn shift_one_year_back(&self) -> Self {
        Self {
            start: shift_years(self.start, -1),
            end: shift_years(self.end, -1),
        }
    }

    /// Inverse of [`DateRange::shift_one_year_back`] for every date except a
    /// Feb 29 endpoint, which was already clamped to Feb 28 on the way back.
    #[must_use]
    pub fn shift_one_year_forward(&self) -> Self {
        Self {
            start: shift_years(self.start, 1),
            end: shift_years(self.end, 1),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (start, end) = self.portal_format();
        write!(f, "{start} – {end}")
    }
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}
