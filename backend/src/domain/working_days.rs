//! Working-day calendar logic for the budget planner.
//!
//! Given a Buddhist-calendar year and a count of extra non-working days, this
//! module produces the year's breakdown of total days, weekend days, fixed
//! national holidays and net working days. Everything here is pure: storing
//! the result is a separate step owned by
//! [`WorkingDaysService`](super::working_days_service::WorkingDaysService).

use shared::WorkingDayRecord;
use std::collections::BTreeMap;

/// Difference between the Thai Buddhist era and the Gregorian calendar
pub const BUDDHIST_ERA_OFFSET: i64 = 543;

/// Year with an announced holiday calendar
pub const REFERENCE_YEAR: i32 = 2568;

/// Fixed holidays announced for [`REFERENCE_YEAR`]
pub const REFERENCE_YEAR_HOLIDAYS: i32 = 18;

/// Holiday count used for any year without its own entry
pub const DEFAULT_HOLIDAYS: i32 = 16;

/// Explicit year → fixed-holiday-count mapping with a fallback.
///
/// New announcements are added with [`HolidayTable::register`]; the
/// calculator never needs to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayTable {
    entries: BTreeMap<i32, i32>,
    fallback: i32,
}

impl HolidayTable {
    /// Create an empty table that answers `fallback` for every year
    pub fn new(fallback: i32) -> Self {
        Self {
            entries: BTreeMap::new(),
            fallback,
        }
    }

    /// Register (or replace) the holiday count for a year, returning the previous entry
    pub fn register(&mut self, buddhist_year: i32, holidays: i32) -> Option<i32> {
        self.entries.insert(buddhist_year, holidays)
    }

    /// Builder form of [`HolidayTable::register`]
    pub fn with_entry(mut self, buddhist_year: i32, holidays: i32) -> Self {
        self.register(buddhist_year, holidays);
        self
    }

    /// Fixed holiday count for a year
    pub fn count_for(&self, buddhist_year: i32) -> i32 {
        self.entries
            .get(&buddhist_year)
            .copied()
            .unwrap_or(self.fallback)
    }

}

impl Default for HolidayTable {
    fn default() -> Self {
        Self::new(DEFAULT_HOLIDAYS).with_entry(REFERENCE_YEAR, REFERENCE_YEAR_HOLIDAYS)
    }
}

/// Check if a Buddhist-calendar year is a leap year.
///
/// The year is converted to Gregorian (minus 543) and then the usual rule
/// applies. Widened to `i64` so every `i32` input is accepted.
pub fn is_leap_year(buddhist_year: i32) -> bool {
    let year = i64::from(buddhist_year) - BUDDHIST_ERA_OFFSET;
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Stateless calculator for [`WorkingDayRecord`]s
#[derive(Debug, Clone, Default)]
pub struct WorkingDaysCalculator {
    holidays: HolidayTable,
}

impl WorkingDaysCalculator {
    /// Create a calculator with the built-in holiday table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator backed by a custom holiday table
    pub fn with_holiday_table(holidays: HolidayTable) -> Self {
        Self { holidays }
    }

    pub fn holiday_table(&self) -> &HolidayTable {
        &self.holidays
    }

    /// See [`is_leap_year`]
    pub fn is_leap_year(&self, buddhist_year: i32) -> bool {
        is_leap_year(buddhist_year)
    }

    /// Number of days in the year (365 or 366)
    pub fn total_days(&self, buddhist_year: i32) -> i32 {
        if is_leap_year(buddhist_year) {
            366
        } else {
            365
        }
    }

    /// Approximate Saturday + Sunday count: whole weeks times two.
    ///
    /// This ignores which weekday January 1 falls on. Budget totals are
    /// derived from this figure, so it must stay as is.
    pub fn weekend_days(&self, total_days: i32) -> i32 {
        (total_days / 7) * 2
    }

    /// Fixed national holidays for the year
    pub fn holiday_count(&self, buddhist_year: i32) -> i32 {
        self.holidays.count_for(buddhist_year)
    }

    /// Compute the full breakdown for a year.
    ///
    /// Never fails: negative or oversized `additional_holidays` are taken as
    /// given and may produce negative working days. The subtraction wraps at
    /// the `i32` extremes.
    pub fn compute_working_days(
        &self,
        buddhist_year: i32,
        additional_holidays: i32,
    ) -> WorkingDayRecord {
        let total_days = self.total_days(buddhist_year);
        let weekend_days = self.weekend_days(total_days);
        let holidays = self.holiday_count(buddhist_year);
        let working_days = total_days
            .wrapping_sub(weekend_days)
            .wrapping_sub(holidays)
            .wrapping_sub(additional_holidays);

        WorkingDayRecord {
            id: None,
            year: buddhist_year,
            total_days,
            weekend_days,
            holidays,
            additional_holidays,
            working_days,
        }
    }
}
