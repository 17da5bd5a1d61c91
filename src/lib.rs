//! SLA due-date engine for design-job submissions.
//!
//! Computes when design jobs are due, counting working days only, and
//! decides whether a submission may be accepted right now. Everything is a
//! pure, synchronous computation over caller-supplied values: no I/O apart
//! from optional config loading, no shared state.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `HolidaySet`, `WorkCalendar`, `JobNode`,
//!   `JobBatch`, `ComputedSchedule`, `SlaStatus`
//! - **`scheduler`**: Working-day walker, dependency-chain timeline resolver,
//!   timeline KPIs
//! - **`gate`**: Submission window gate (blackout, weekend, holiday, quota)
//! - **`validation`**: Batch integrity checks (predecessor ordering)
//! - **`format`**: Display helpers (ISO, Thai, English)
//! - **`config`**: TOML engine configuration
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use dj_sla::models::{HolidaySet, JobNode, WorkCalendar};
//! use dj_sla::scheduler::TimelineResolver;
//!
//! let holidays = HolidaySet::from_dates([NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()]);
//! let calendar = WorkCalendar::new(holidays);
//! let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let schedule = TimelineResolver::new(&calendar)
//!     .resolve_nodes(start, vec![JobNode::new(5).with_label("Artwork")])
//!     .unwrap();
//! assert_eq!(schedule.overall_due_date(), NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod gate;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::EngineConfig;
pub use error::EngineError;
