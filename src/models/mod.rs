//! SLA domain models.
//!
//! Provides the value types the engine computes over: calendars, job
//! batches, computed schedules and SLA status.
//!
//! # Domain Mappings
//!
//! | dj-sla | Design-job workflow |
//! |--------|---------------------|
//! | HolidaySet | Organization holiday calendar |
//! | JobNode | Selected job type with its configured SLA |
//! | JobBatch | Composite submission (parent/child jobs) |
//! | ComputedSchedule | Start/due dates persisted with the job record |

mod calendar;
mod job;
mod schedule;
mod sla;

pub use calendar::{CalendarDay, HolidaySet, NonWorkingReason, WorkCalendar};
pub use job::{JobBatch, JobNode, WorkingDaySpec};
pub use schedule::{ComputedSchedule, ScheduledJob};
pub use sla::{SlaSeverity, SlaStatus, DEFAULT_WARNING_WORKING_DAYS};

pub(crate) use job::coerce_sla;
