//! Dependency-chain timeline resolver.
//!
//! # Algorithm
//!
//! 1. Visit nodes in batch order.
//! 2. A node without predecessor starts on the batch start day; a chained
//!    node starts on its predecessor's due day.
//! 3. The node's due day is its start plus its SLA in working days.
//! 4. The overall due day is the latest node due day.
//!
//! Predecessors always sit at smaller positions (enforced by [`JobBatch`]),
//! so a single forward pass replaces a topological sort.
//!
//! # Complexity
//! O(n * s) where n = nodes, s = longest SLA walk.

use crate::error::EngineError;
use crate::models::{
    CalendarDay, ComputedSchedule, JobBatch, JobNode, ScheduledJob, WorkCalendar,
};

/// Resolves job batches into computed schedules.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dj_sla::models::{JobNode, WorkCalendar};
/// use dj_sla::scheduler::TimelineResolver;
///
/// let calendar = WorkCalendar::default();
/// let resolver = TimelineResolver::new(&calendar);
/// let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
///
/// let schedule = resolver
///     .resolve_nodes(start, vec![JobNode::new(3), JobNode::new(2).after(0)])
///     .unwrap();
/// assert_eq!(schedule.overall_due_date(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimelineResolver<'a> {
    calendar: &'a WorkCalendar,
}

impl<'a> TimelineResolver<'a> {
    /// Creates a resolver over a calendar.
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self { calendar }
    }

    /// Resolves a validated batch.
    pub fn resolve(&self, batch_start: impl CalendarDay, batch: &JobBatch) -> ComputedSchedule {
        let batch_start = batch_start.calendar_day();
        let mut jobs: Vec<ScheduledJob> = Vec::with_capacity(batch.len());

        for (index, node) in batch.nodes().iter().enumerate() {
            // Predecessors are strictly earlier, so their due date is known.
            let start_date = match node.predecessor {
                Some(pred) => jobs[pred].due_date,
                None => batch_start,
            };
            let due_date = self
                .calendar
                .add_working_days(start_date, i64::from(node.sla_working_days()));

            jobs.push(ScheduledJob {
                index,
                label: node.label.clone(),
                sla_working_days: node.sla_working_days(),
                predecessor: node.predecessor,
                start_date,
                due_date,
            });
        }

        let schedule = ComputedSchedule::new(batch_start, jobs);
        tracing::debug!(
            %batch_start,
            jobs = schedule.len(),
            overall_due = %schedule.overall_due_date(),
            "timeline resolved"
        );
        schedule
    }

    /// Validates raw nodes, then resolves them.
    ///
    /// # Errors
    /// [`EngineError::InvalidJobSpec`] if any predecessor does not point
    /// strictly backwards, or the batch is empty. No dates are computed in
    /// that case.
    pub fn resolve_nodes(
        &self,
        batch_start: impl CalendarDay,
        nodes: Vec<JobNode>,
    ) -> Result<ComputedSchedule, EngineError> {
        let batch = JobBatch::new(nodes)?;
        Ok(self.resolve(batch_start, &batch))
    }
}
