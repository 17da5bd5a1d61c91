//! Timeline summary metrics.
//!
//! Condenses a computed schedule into the figures a submission form or
//! dashboard shows next to the overall due date.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Working Days | Working days in (batch start, overall due] |
//! | Calendar Days | Calendar days from batch start to overall due |
//! | Critical Path | Chain of jobs ending at the overall due date |
//! | Parallel Jobs | Jobs starting with the batch |
//! | Chained Jobs | Jobs waiting on another job |
//! | Max Chain Depth | Longest predecessor chain, in hops |

use serde::{Deserialize, Serialize};

use crate::models::{ComputedSchedule, WorkCalendar};

/// Summary of a computed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineKpi {
    /// Working days from batch start to overall due date.
    pub total_working_days: u32,
    /// Calendar days from batch start to overall due date.
    pub calendar_days: i64,
    /// Job positions from a root to the job holding the overall due date.
    pub critical_path: Vec<usize>,
    /// Jobs without predecessor.
    pub parallel_jobs: usize,
    /// Jobs with a predecessor.
    pub chained_jobs: usize,
    /// Longest predecessor chain (0 = all parallel).
    pub max_chain_depth: usize,
}

impl TimelineKpi {
    /// Computes the summary of `schedule` under `calendar`.
    pub fn calculate(schedule: &ComputedSchedule, calendar: &WorkCalendar) -> Self {
        let start = schedule.batch_start();
        let due = schedule.overall_due_date();

        let chained_jobs = schedule
            .jobs()
            .iter()
            .filter(|j| j.predecessor.is_some())
            .count();

        let max_chain_depth = (0..schedule.len())
            .map(|i| schedule.chain_depth(i))
            .max()
            .unwrap_or(0);

        Self {
            total_working_days: calendar.working_days_between(start, due),
            calendar_days: (due - start).num_days(),
            critical_path: schedule.critical_path(),
            parallel_jobs: schedule.len() - chained_jobs,
            chained_jobs,
            max_chain_depth,
        }
    }

    /// Whether the whole batch completes within `working_days`.
    pub fn fits_within(&self, working_days: u32) -> bool {
        self.total_working_days <= working_days
    }
}
