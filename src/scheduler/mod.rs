//! Due-date computation and timeline metrics.
//!
//! # Algorithm
//!
//! `add_working_days` walks forward one calendar day at a time, counting
//! only days that are neither weekend days nor holidays.
//! `TimelineResolver` applies it to every job of a batch in a single
//! forward pass, chaining a job's start to its predecessor's due date.
//!
//! # KPI
//!
//! `TimelineKpi` summarizes a computed schedule: total working days,
//! critical path, and chain structure.

mod kpi;
mod timeline;
mod walker;

pub use kpi::TimelineKpi;
pub use timeline::TimelineResolver;
pub use walker::{add_working_days, due_date_for};
