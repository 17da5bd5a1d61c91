//! Working-day date walker.
//!
//! # Algorithm
//!
//! 1. Put a cursor on the start's calendar day (that day is never counted).
//! 2. Advance one calendar day.
//! 3. Skip the day if it is a weekend day or a holiday; otherwise count it.
//! 4. Stop once the requested number of working days has been counted.
//!
//! # Complexity
//! O(n + h + w) where n = working days, h = holidays hit, w = weekend days hit.

use chrono::NaiveDate;

use crate::models::{coerce_sla, CalendarDay, HolidaySet, WorkCalendar, WorkingDaySpec};

/// Adds working days using a Saturday/Sunday weekend.
///
/// Counting begins on the day after the calendar day of `start`.
/// `working_days <= 0` is treated as 1.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dj_sla::models::HolidaySet;
/// use dj_sla::scheduler::add_working_days;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let holidays = HolidaySet::from_dates([NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()]);
///
/// let due = add_working_days(monday, 5, &holidays);
/// assert_eq!(due, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
/// ```
pub fn add_working_days(
    start: impl CalendarDay,
    working_days: i64,
    holidays: &HolidaySet,
) -> NaiveDate {
    let start = start.calendar_day();
    let remaining = coerce_sla(working_days);
    walk(start, remaining, |day| {
        !is_default_weekend(day) && !holidays.contains(day)
    })
}

/// Resolves a [`WorkingDaySpec`] against a Saturday/Sunday weekend.
pub fn due_date_for(spec: &WorkingDaySpec, holidays: &HolidaySet) -> NaiveDate {
    add_working_days(spec.start, i64::from(spec.working_days), holidays)
}

impl WorkCalendar {
    /// Adds working days using this calendar's weekend and holidays.
    ///
    /// Counting begins on the day after the calendar day of `start`.
    /// `working_days <= 0` is treated as 1. Saturates at `NaiveDate::MAX`.
    pub fn add_working_days(&self, start: impl CalendarDay, working_days: i64) -> NaiveDate {
        let start = start.calendar_day();
        let remaining = coerce_sla(working_days);
        walk(start, remaining, |day| self.is_working_day(day))
    }

    /// Resolves a [`WorkingDaySpec`] against this calendar.
    pub fn due_date_for(&self, spec: &WorkingDaySpec) -> NaiveDate {
        self.add_working_days(spec.start, i64::from(spec.working_days))
    }
}

fn is_default_weekend(day: NaiveDate) -> bool {
    use chrono::{Datelike, Weekday};
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Core loop shared by the free function and the calendar method.
fn walk(start: NaiveDate, working_days: u32, is_working: impl Fn(NaiveDate) -> bool) -> NaiveDate {
    let mut cursor = start;
    let mut remaining = working_days;
    while remaining > 0 {
        cursor = match cursor.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if is_working(cursor) {
            remaining -= 1;
        }
    }
    tracing::debug!(%start, working_days, due = %cursor, "working days added");
    cursor
}
