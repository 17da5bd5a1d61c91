//! Working-day calendar models.
//!
//! Defines which calendar days count as working days: a weekly weekend
//! pattern plus an explicit set of holidays.
//!
//! # Day Model
//! Every comparison happens on calendar days (`NaiveDate`). Instants are
//! truncated with [`CalendarDay`] before use: a zoned `DateTime` is
//! truncated in its own offset, a naive date-time simply drops its time.
//!
//! # Precedence
//! A day is a working day iff:
//! - Its weekday is NOT in the weekend pattern, AND
//! - It is NOT in the holiday set.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Truncation of a date or instant to its calendar day.
pub trait CalendarDay {
    /// The calendar day this value falls on.
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    #[inline]
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    #[inline]
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    #[inline]
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    #[inline]
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

/// A set of non-working calendar days beyond ordinary weekends.
///
/// Stored ordered so iteration and serialization are deterministic.
/// Serializes as a list of `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet {
    days: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holiday set from dates or instants.
    pub fn from_dates<I, D>(dates: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: CalendarDay,
    {
        let mut set = Self::new();
        set.extend(dates);
        set
    }

    /// Adds a holiday. Returns `false` if the day was already present.
    pub fn insert(&mut self, day: impl CalendarDay) -> bool {
        self.days.insert(day.calendar_day())
    }

    /// Adds several holidays.
    pub fn extend<I, D>(&mut self, dates: I)
    where
        I: IntoIterator<Item = D>,
        D: CalendarDay,
    {
        self.days.extend(dates.into_iter().map(|d| d.calendar_day()));
    }

    /// Whether the calendar day of `day` is a holiday.
    #[inline]
    pub fn contains(&self, day: impl CalendarDay) -> bool {
        self.days.contains(&day.calendar_day())
    }

    /// Number of holidays.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Holidays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.iter()
    }

    /// Holidays within `[from, to]`, ascending.
    pub fn in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        if to < from {
            return Vec::new();
        }
        self.days.range(from..=to).copied().collect()
    }
}

impl<D: CalendarDay> FromIterator<D> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        Self::from_dates(iter)
    }
}

/// Why a day is not a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonWorkingReason {
    /// The weekday is part of the weekend pattern.
    Weekend,
    /// The day is in the holiday set.
    Holiday,
}

/// Working-day calendar: weekend pattern plus holidays.
///
/// Defaults to a Saturday/Sunday weekend with no holidays. Deserialization
/// goes through [`WorkCalendar::with_weekend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkCalendarRaw")]
pub struct WorkCalendar {
    weekend: Vec<Weekday>,
    holidays: HolidaySet,
}

/// Unchecked wire form of a [`WorkCalendar`].
#[derive(Deserialize)]
struct WorkCalendarRaw {
    weekend: Vec<Weekday>,
    #[serde(default)]
    holidays: HolidaySet,
}

impl TryFrom<WorkCalendarRaw> for WorkCalendar {
    type Error = EngineError;

    fn try_from(raw: WorkCalendarRaw) -> Result<Self, Self::Error> {
        Self::with_weekend(raw.weekend, raw.holidays)
    }
}

impl WorkCalendar {
    /// Saturday/Sunday weekend with the given holidays.
    pub fn new(holidays: HolidaySet) -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
            holidays,
        }
    }

    /// Custom weekend pattern.
    ///
    /// # Errors
    /// [`EngineError::NoWorkingDays`] if every weekday is a weekend day,
    /// since no number of working days could ever elapse.
    pub fn with_weekend(
        weekend: impl IntoIterator<Item = Weekday>,
        holidays: HolidaySet,
    ) -> Result<Self, EngineError> {
        let mut days: Vec<Weekday> = Vec::new();
        for day in weekend {
            if !days.contains(&day) {
                days.push(day);
            }
        }
        if days.len() >= 7 {
            return Err(EngineError::NoWorkingDays);
        }
        days.sort_by_key(|d| d.num_days_from_monday());
        Ok(Self {
            weekend: days,
            holidays,
        })
    }

    /// Weekend days, Monday-first order.
    pub fn weekend(&self) -> &[Weekday] {
        &self.weekend
    }

    /// Holiday set.
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Whether the weekday of `day` is a weekend day.
    #[inline]
    pub fn is_weekend(&self, day: impl CalendarDay) -> bool {
        self.weekend.contains(&day.calendar_day().weekday())
    }

    /// Why `day` is not a working day, or `None` if it is one.
    ///
    /// A holiday falling on a weekend reports `Weekend`.
    pub fn non_working_reason(&self, day: impl CalendarDay) -> Option<NonWorkingReason> {
        let day = day.calendar_day();
        if self.is_weekend(day) {
            Some(NonWorkingReason::Weekend)
        } else if self.holidays.contains(day) {
            Some(NonWorkingReason::Holiday)
        } else {
            None
        }
    }

    /// Whether `day` is a working day.
    #[inline]
    pub fn is_working_day(&self, day: impl CalendarDay) -> bool {
        self.non_working_reason(day).is_none()
    }

    /// First working day strictly after the calendar day of `after`.
    ///
    /// Saturates at `NaiveDate::MAX`.
    pub fn next_working_day(&self, after: impl CalendarDay) -> NaiveDate {
        self.add_working_days(after, 1)
    }

    /// Counts working days in `(from, to]`.
    ///
    /// Inverse of [`add_working_days`](Self::add_working_days):
    /// `working_days_between(d, add_working_days(d, n)) == n`.
    /// Returns 0 when `to` is not after `from`.
    pub fn working_days_between(&self, from: impl CalendarDay, to: impl CalendarDay) -> u32 {
        let from = from.calendar_day();
        let to = to.calendar_day();
        let mut count = 0u32;
        let mut cursor = from;
        while cursor < to {
            match cursor.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
            if self.is_working_day(cursor) {
                count += 1;
            }
        }
        count
    }
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new(HolidaySet::new())
    }
}
