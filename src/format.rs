//! Date display helpers.
//!
//! Computed dates are locale-neutral `NaiveDate`s. These helpers render
//! them for the usual display targets: ISO, Thai (Buddhist era year with
//! abbreviated Thai month) and short English.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Offset between the Buddhist era and the Gregorian year.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

const THAI_MONTHS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.",
    "ธ.ค.",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Output style for [`format_date`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// `2024-06-10`
    #[default]
    Iso,
    /// `10 มิ.ย. 2567`
    Thai,
    /// `10 Jun 2024`
    English,
}

/// Gregorian year to Buddhist era year.
#[inline]
pub fn to_buddhist_year(year: i32) -> i32 {
    year + BUDDHIST_ERA_OFFSET
}

/// Abbreviated Thai month name for `month` in 1..=12.
pub fn thai_month_abbrev(month: u32) -> Option<&'static str> {
    month_index(month).map(|i| THAI_MONTHS[i])
}

/// Abbreviated English month name for `month` in 1..=12.
pub fn english_month_abbrev(month: u32) -> Option<&'static str> {
    month_index(month).map(|i| ENGLISH_MONTHS[i])
}

fn month_index(month: u32) -> Option<usize> {
    (1..=12).contains(&month).then(|| (month - 1) as usize)
}

/// Renders a date in the given style.
///
/// ```
/// use chrono::NaiveDate;
/// use dj_sla::format::{format_date, DateStyle};
///
/// let due = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// assert_eq!(format_date(due, DateStyle::Thai), "10 มิ.ย. 2567");
/// ```
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    // month() is always 1..=12, so the lookups cannot miss.
    let month = date.month0() as usize;
    match style {
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateStyle::Thai => format!(
            "{} {} {}",
            date.day(),
            THAI_MONTHS[month],
            to_buddhist_year(date.year())
        ),
        DateStyle::English => format!("{} {} {}", date.day(), ENGLISH_MONTHS[month], date.year()),
    }
}

/// Renders a start/due pair as `start - due`.
pub fn format_range(start: NaiveDate, due: NaiveDate, style: DateStyle) -> String {
    format!("{} - {}", format_date(start, style), format_date(due, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_buddhist_year() {
        assert_eq!(to_buddhist_year(2024), 2567);
        assert_eq!(to_buddhist_year(1957), 2500);
    }

    #[test]
    fn test_month_abbrev() {
        assert_eq!(thai_month_abbrev(1), Some("ม.ค."));
        assert_eq!(thai_month_abbrev(12), Some("ธ.ค."));
        assert_eq!(english_month_abbrev(6), Some("Jun"));
        assert_eq!(thai_month_abbrev(0), None);
        assert_eq!(english_month_abbrev(13), None);
    }

    #[test]
    fn test_format_styles() {
        let date = d(2024, 4, 5);
        assert_eq!(format_date(date, DateStyle::Iso), "2024-04-05");
        assert_eq!(format_date(date, DateStyle::Thai), "5 เม.ย. 2567");
        assert_eq!(format_date(date, DateStyle::English), "5 Apr 2024");
        assert_eq!(DateStyle::default(), DateStyle::Iso);
    }

    #[test]
    fn test_format_range() {
        assert_eq!(
            format_range(d(2024, 6, 3), d(2024, 6, 10), DateStyle::English),
            "3 Jun 2024 - 10 Jun 2024"
        );
    }
}
