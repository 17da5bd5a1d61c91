//! Engine configuration.
//!
//! Loaded from TOML. Every section is optional; missing values fall back
//! to a Saturday/Sunday weekend, no holidays and an open submission window.
//!
//! ```toml
//! weekend = ["Sat", "Sun"]
//! holidays = ["2024-04-13", "2024-04-15"]
//! sla_warning_working_days = 2
//!
//! [submission]
//! max_daily_submissions_per_project = 5
//!
//! [submission.blackout]
//! start = "22:00:00"
//! end = "06:00:00"
//! ```

use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::gate::{SubmissionGate, SubmissionPolicy};
use crate::models::{
    HolidaySet, SlaSeverity, SlaStatus, WorkCalendar, DEFAULT_WARNING_WORKING_DAYS,
};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weekend days.
    pub weekend: Vec<Weekday>,
    /// Organization-wide holidays.
    pub holidays: HolidaySet,
    /// Remaining working days at which a job is flagged as at risk.
    pub sla_warning_working_days: u32,
    /// Submission window rules.
    pub submission: SubmissionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
            holidays: HolidaySet::new(),
            sla_warning_working_days: DEFAULT_WARNING_WORKING_DAYS,
            submission: SubmissionPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            holidays = config.holidays.len(),
            "engine config loaded"
        );
        Ok(config)
    }

    /// Builds the working-day calendar.
    ///
    /// # Errors
    /// [`EngineError::NoWorkingDays`] if the weekend covers the whole week.
    pub fn work_calendar(&self) -> Result<WorkCalendar, EngineError> {
        WorkCalendar::with_weekend(self.weekend.iter().copied(), self.holidays.clone())
    }

    /// Builds a gate over this config's policy and a calendar.
    pub fn gate<'a>(&'a self, calendar: &'a WorkCalendar) -> SubmissionGate<'a> {
        SubmissionGate::new(&self.submission, calendar)
    }

    /// Severity of an SLA status under this config's warning margin.
    pub fn sla_severity(&self, status: &SlaStatus) -> SlaSeverity {
        status.severity(self.sla_warning_working_days)
    }
}
