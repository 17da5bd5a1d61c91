//! SLA tracking against due dates.
//!
//! Classifies a job's progress relative to its due date in working days:
//! how many remain, or how many have passed since the deadline.
//!
//! # Concepts
//!
//! - [`SlaStatus`]: where "as of" sits relative to the due date
//! - [`SlaSeverity`]: coarse traffic-light view for dashboards

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::{CalendarDay, WorkCalendar};

/// Default number of remaining working days at which a job turns `Warning`.
pub const DEFAULT_WARNING_WORKING_DAYS: u32 = 1;

/// Position of a point in time relative to a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlaStatus {
    /// Due date is still ahead.
    OnTrack {
        /// Working days in `(as_of, due]`.
        working_days_left: u32,
    },
    /// Due date is today.
    DueToday,
    /// Due date has passed.
    Overdue {
        /// Working days in `(due, as_of]`.
        working_days_late: u32,
    },
}

/// Severity of an SLA status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlaSeverity {
    /// Comfortable margin.
    Ok,
    /// Due today or within the warning margin.
    Warning,
    /// Past due.
    Breached,
}

impl SlaStatus {
    /// Evaluates `due` as seen on the calendar day of `as_of`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use dj_sla::models::{SlaStatus, WorkCalendar};
    ///
    /// let cal = WorkCalendar::default();
    /// let due = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    /// let friday = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
    /// assert_eq!(
    ///     SlaStatus::evaluate(due, friday, &cal),
    ///     SlaStatus::OnTrack { working_days_left: 1 }
    /// );
    /// ```
    pub fn evaluate(due: NaiveDate, as_of: impl CalendarDay, calendar: &WorkCalendar) -> Self {
        let today = as_of.calendar_day();
        if today < due {
            Self::OnTrack {
                working_days_left: calendar.working_days_between(today, due),
            }
        } else if today == due {
            Self::DueToday
        } else {
            Self::Overdue {
                working_days_late: calendar.working_days_between(due, today),
            }
        }
    }

    /// Whether the due date has passed.
    pub fn is_overdue(&self) -> bool {
        matches!(self, Self::Overdue { .. })
    }

    /// Severity, turning `Warning` once at most `warning_days` remain.
    pub fn severity(&self, warning_days: u32) -> SlaSeverity {
        match *self {
            Self::OnTrack { working_days_left } if working_days_left > warning_days => {
                SlaSeverity::Ok
            }
            Self::OnTrack { .. } | Self::DueToday => SlaSeverity::Warning,
            Self::Overdue { .. } => SlaSeverity::Breached,
        }
    }
}
