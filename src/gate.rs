//! Submission window gate.
//!
//! Decides whether a new submission may be accepted *now*. A rejection
//! carries a stable reason code, a human-readable reason and whether the
//! caller may defer the submission to the next valid instant instead.
//!
//! # Checks (in order)
//!
//! | Check | Code | Deferrable |
//! |-------|------|------------|
//! | Nightly blackout window | `blackout_window` | yes |
//! | Weekend day | `weekend` | yes |
//! | Holiday | `holiday` | yes |
//! | Per-project daily quota | `daily_quota_exceeded` | no |
//!
//! The gate never retries or queues anything itself.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{CalendarDay, NonWorkingReason, WorkCalendar};

/// How far ahead [`SubmissionGate::next_valid_instant`] searches.
const MAX_SEARCH_DAYS: i64 = 366;

/// A daily window `[start, end)` of local time during which submissions are
/// refused. Wraps midnight when `end <= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutWindow {
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl BlackoutWindow {
    /// Creates a blackout window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether the window crosses midnight.
    #[inline]
    pub fn wraps_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a time of day falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            return false;
        }
        if self.wraps_midnight() {
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }

    /// First instant at or after `now` that lies outside the window.
    fn exit_from(&self, now: NaiveDateTime) -> NaiveDateTime {
        if !self.contains(now.time()) {
            return now;
        }
        let day = now.date();
        if self.wraps_midnight() && now.time() >= self.start {
            match day.succ_opt() {
                Some(next) => next.and_time(self.end),
                None => now,
            }
        } else {
            day.and_time(self.end)
        }
    }
}

/// Submission rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionPolicy {
    /// Daily maintenance window. `None` = no blackout.
    pub blackout: Option<BlackoutWindow>,
    /// Refuse submissions on weekend days.
    pub reject_weekends: bool,
    /// Refuse submissions on holidays.
    pub reject_holidays: bool,
    /// Maximum submissions per project per calendar day. `None` = unlimited.
    pub max_daily_submissions_per_project: Option<u32>,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            blackout: None,
            reject_weekends: true,
            reject_holidays: true,
            max_daily_submissions_per_project: None,
        }
    }
}

impl SubmissionPolicy {
    /// Sets the blackout window.
    pub fn with_blackout(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.blackout = Some(BlackoutWindow::new(start, end));
        self
    }

    /// Sets the per-project daily quota.
    pub fn with_daily_quota(mut self, max: u32) -> Self {
        self.max_daily_submissions_per_project = Some(max);
        self
    }

    /// Allows or refuses weekend submissions.
    pub fn with_weekends_allowed(mut self, allowed: bool) -> Self {
        self.reject_weekends = !allowed;
        self
    }

    /// Allows or refuses holiday submissions.
    pub fn with_holidays_allowed(mut self, allowed: bool) -> Self {
        self.reject_holidays = !allowed;
        self
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRejection {
    /// Inside the blackout window.
    BlackoutWindow {
        /// Window start.
        start: NaiveTime,
        /// Window end.
        end: NaiveTime,
    },
    /// Today is a weekend day.
    Weekend,
    /// Today is a holiday.
    Holiday,
    /// The project already reached its daily quota.
    DailyQuotaExceeded {
        /// Configured quota.
        limit: u32,
    },
}

impl GateRejection {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlackoutWindow { .. } => "blackout_window",
            Self::Weekend => "weekend",
            Self::Holiday => "holiday",
            Self::DailyQuotaExceeded { .. } => "daily_quota_exceeded",
        }
    }

    /// Human-readable reason.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Whether the caller may defer the submission to the next valid instant.
    pub fn can_schedule(&self) -> bool {
        !matches!(self, Self::DailyQuotaExceeded { .. })
    }
}

impl fmt::Display for GateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlackoutWindow { start, end } => write!(
                f,
                "Submissions are closed between {} and {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            Self::Weekend => write!(f, "Submissions are closed on weekends"),
            Self::Holiday => write!(f, "Submissions are closed on holidays"),
            Self::DailyQuotaExceeded { limit } => write!(
                f,
                "Daily submission limit of {limit} for this project has been reached"
            ),
        }
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "rejection", rename_all = "snake_case")]
pub enum GateDecision {
    /// Submission may proceed.
    Accepted,
    /// Submission refused.
    Rejected(GateRejection),
}

impl GateDecision {
    /// Whether the submission may proceed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The rejection, if any.
    pub fn rejection(&self) -> Option<&GateRejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(r) => Some(r),
        }
    }

    /// Rejection reason, if any.
    pub fn reason(&self) -> Option<String> {
        self.rejection().map(GateRejection::reason)
    }

    /// Whether a rejected submission may be deferred. `false` when accepted.
    pub fn can_schedule(&self) -> bool {
        self.rejection().is_some_and(GateRejection::can_schedule)
    }
}

/// Applies a [`SubmissionPolicy`] against a [`WorkCalendar`].
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use dj_sla::gate::{SubmissionGate, SubmissionPolicy};
/// use dj_sla::models::WorkCalendar;
///
/// let policy = SubmissionPolicy::default().with_blackout(
///     NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// );
/// let calendar = WorkCalendar::default();
/// let gate = SubmissionGate::new(&policy, &calendar);
///
/// let late = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap().and_hms_opt(23, 0, 0).unwrap();
/// let decision = gate.check(late, 0);
/// assert!(!decision.is_accepted());
/// assert!(decision.can_schedule());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SubmissionGate<'a> {
    policy: &'a SubmissionPolicy,
    calendar: &'a WorkCalendar,
}

impl<'a> SubmissionGate<'a> {
    /// Creates a gate.
    pub fn new(policy: &'a SubmissionPolicy, calendar: &'a WorkCalendar) -> Self {
        Self { policy, calendar }
    }

    /// Checks a submission made at local time `now`, given how many
    /// submissions the project already made on `now`'s calendar day.
    pub fn check(&self, now: NaiveDateTime, submissions_today: u32) -> GateDecision {
        let decision = match self.window_rejection(now) {
            Some(rejection) => GateDecision::Rejected(rejection),
            None => match self.policy.max_daily_submissions_per_project {
                Some(limit) if submissions_today >= limit => {
                    GateDecision::Rejected(GateRejection::DailyQuotaExceeded { limit })
                }
                _ => GateDecision::Accepted,
            },
        };

        if let GateDecision::Rejected(rejection) = &decision {
            tracing::warn!(
                %now,
                code = rejection.code(),
                can_schedule = rejection.can_schedule(),
                "submission rejected"
            );
        } else {
            tracing::debug!(%now, submissions_today, "submission accepted");
        }
        decision
    }

    /// Earliest instant at or after `now` that passes the blackout, weekend
    /// and holiday checks. The quota is not considered.
    ///
    /// Returns `None` if nothing qualifies within a year.
    pub fn next_valid_instant(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let horizon = now.date().checked_add_signed(Duration::days(MAX_SEARCH_DAYS))?;
        let mut cursor = now;

        while cursor.date() <= horizon {
            if self.day_rejection(cursor.date()).is_some() {
                cursor = start_of_next_day(cursor.date())?;
                continue;
            }
            match self.policy.blackout {
                Some(window) if window.contains(cursor.time()) => {
                    let exit = window.exit_from(cursor);
                    if exit == cursor {
                        return None;
                    }
                    cursor = exit;
                }
                _ => return Some(cursor),
            }
        }
        None
    }

    fn window_rejection(&self, now: NaiveDateTime) -> Option<GateRejection> {
        if let Some(window) = self.policy.blackout {
            if window.contains(now.time()) {
                return Some(GateRejection::BlackoutWindow {
                    start: window.start,
                    end: window.end,
                });
            }
        }
        self.day_rejection(now.calendar_day())
    }

    fn day_rejection(&self, day: NaiveDate) -> Option<GateRejection> {
        match self.calendar.non_working_reason(day) {
            Some(NonWorkingReason::Weekend) if self.policy.reject_weekends => {
                Some(GateRejection::Weekend)
            }
            Some(NonWorkingReason::Weekend) if self.policy.reject_holidays => {
                // Weekend that is also a holiday, with weekends allowed.
                self.calendar
                    .holidays()
                    .contains(day)
                    .then_some(GateRejection::Holiday)
            }
            Some(NonWorkingReason::Holiday) if self.policy.reject_holidays => {
                Some(GateRejection::Holiday)
            }
            _ => None,
        }
    }
}

fn start_of_next_day(day: NaiveDate) -> Option<NaiveDateTime> {
    day.succ_opt().map(|next| next.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HolidaySet;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap().and_time(t(h, m))
    }

    fn nightly() -> SubmissionPolicy {
        SubmissionPolicy::default().with_blackout(t(22, 0), t(6, 0))
    }

    #[test]
    fn test_blackout_window_contains() {
        let w = BlackoutWindow::new(t(22, 0), t(6, 0));
        assert!(w.wraps_midnight());
        assert!(w.contains(t(22, 0)));
        assert!(w.contains(t(3, 0)));
        assert!(!w.contains(t(6, 0))); // exclusive end
        assert!(!w.contains(t(12, 0)));

        let day = BlackoutWindow::new(t(12, 0), t(13, 0));
        assert!(!day.wraps_midnight());
        assert!(day.contains(t(12, 30)));
        assert!(!day.contains(t(13, 0)));

        assert!(!BlackoutWindow::new(t(1, 0), t(1, 0)).contains(t(1, 0)));
    }

    #[test]
    fn test_accepts_working_day() {
        let policy = nightly();
        let cal = WorkCalendar::default();
        let decision = SubmissionGate::new(&policy, &cal).check(at(4, 10, 0), 0);
        assert_eq!(decision, GateDecision::Accepted);
        assert!(!decision.can_schedule());
        assert_eq!(decision.reason(), None);
    }

    #[test]
    fn test_rejects_blackout() {
        let policy = nightly();
        let cal = WorkCalendar::default();
        let decision = SubmissionGate::new(&policy, &cal).check(at(4, 23, 15), 0);
        let rejection = decision.rejection().unwrap();
        assert_eq!(rejection.code(), "blackout_window");
        assert!(rejection.can_schedule());
        assert!(decision.reason().unwrap().contains("22:00"));
    }

    #[test]
    fn test_rejects_weekend_and_holiday() {
        let policy = SubmissionPolicy::default();
        let holidays = HolidaySet::from_dates([NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()]);
        let cal = WorkCalendar::new(holidays);
        let gate = SubmissionGate::new(&policy, &cal);

        let saturday = gate.check(at(8, 10, 0), 0);
        assert_eq!(saturday, GateDecision::Rejected(GateRejection::Weekend));
        assert!(saturday.can_schedule());

        let holiday = gate.check(at(5, 10, 0), 0);
        assert_eq!(holiday, GateDecision::Rejected(GateRejection::Holiday));
        assert!(holiday.can_schedule());
    }

    #[test]
    fn test_quota_is_hard_rejection() {
        let policy = SubmissionPolicy::default().with_daily_quota(3);
        let cal = WorkCalendar::default();
        let gate = SubmissionGate::new(&policy, &cal);

        assert!(gate.check(at(4, 10, 0), 2).is_accepted());
        let decision = gate.check(at(4, 10, 0), 3);
        assert_eq!(
            decision,
            GateDecision::Rejected(GateRejection::DailyQuotaExceeded { limit: 3 })
        );
        assert!(!decision.can_schedule());
        assert_eq!(decision.rejection().unwrap().code(), "daily_quota_exceeded");
    }

    #[test]
    fn test_window_checks_precede_quota() {
        let policy = SubmissionPolicy::default().with_daily_quota(1);
        let cal = WorkCalendar::default();
        let decision = SubmissionGate::new(&policy, &cal).check(at(9, 10, 0), 5);
        assert_eq!(decision, GateDecision::Rejected(GateRejection::Weekend));
    }

    #[test]
    fn test_allowing_weekends() {
        let policy = SubmissionPolicy::default().with_weekends_allowed(true);
        let sat = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let cal = WorkCalendar::new(HolidaySet::from_dates([sat]));
        let gate = SubmissionGate::new(&policy, &cal);

        // Holiday on a Saturday still refused as a holiday.
        assert_eq!(gate.check(at(8, 10, 0), 0), GateDecision::Rejected(GateRejection::Holiday));
        assert!(gate.check(at(9, 10, 0), 0).is_accepted());
    }

    #[test]
    fn test_next_valid_instant() {
        let policy = nightly();
        let holidays = HolidaySet::from_dates([NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()]);
        let cal = WorkCalendar::new(holidays);
        let gate = SubmissionGate::new(&policy, &cal);

        // Already valid.
        assert_eq!(gate.next_valid_instant(at(4, 10, 0)), Some(at(4, 10, 0)));
        // Tuesday night → Wednesday 06:00.
        assert_eq!(gate.next_valid_instant(at(4, 23, 0)), Some(at(5, 6, 0)));
        // Early morning → same day 06:00.
        assert_eq!(gate.next_valid_instant(at(5, 2, 0)), Some(at(5, 6, 0)));
        // Friday night → skip weekend and Monday holiday → Tuesday 06:00.
        assert_eq!(gate.next_valid_instant(at(7, 22, 30)), Some(at(11, 6, 0)));
    }

    #[test]
    fn test_next_valid_instant_passes_gate() {
        let policy = nightly();
        let cal = WorkCalendar::default();
        let gate = SubmissionGate::new(&policy, &cal);
        for hour in 0..24 {
            for day in 1..=9 {
                let next = gate.next_valid_instant(at(day, hour, 0)).unwrap();
                assert!(next >= at(day, hour, 0));
                assert!(gate.check(next, 0).is_accepted(), "{next} should be accepted");
            }
        }
    }

    #[test]
    fn test_decision_serializes() {
        let json = serde_json::to_string(&GateDecision::Rejected(GateRejection::Weekend)).unwrap();
        assert_eq!(json, r#"{"decision":"rejected","rejection":"weekend"}"#);
    }
}
