//! Computed schedule model.
//!
//! A computed schedule assigns every job in a batch a start day and a due
//! day. It is built once by the timeline resolver and never mutated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Resolved dates for one job of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Position in the batch.
    pub index: usize,
    /// Job type label copied from the node.
    pub label: String,
    /// SLA in working days.
    pub sla_working_days: u32,
    /// Predecessor position, if the job was chained.
    pub predecessor: Option<usize>,
    /// Day counting starts from (not itself counted).
    pub start_date: NaiveDate,
    /// Day the job is due.
    pub due_date: NaiveDate,
}

/// Per-job start/due dates plus the overall due date of a batch.
///
/// Deserialized schedules are checked: job `i` sits at index `i`, every
/// predecessor points strictly backwards, the job list is non-empty, and
/// the overall due date is the latest job due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ComputedScheduleRaw")]
pub struct ComputedSchedule {
    batch_start: NaiveDate,
    jobs: Vec<ScheduledJob>,
    overall_due_date: NaiveDate,
}

#[derive(Deserialize)]
struct ComputedScheduleRaw {
    batch_start: NaiveDate,
    jobs: Vec<ScheduledJob>,
    overall_due_date: NaiveDate,
}

impl TryFrom<ComputedScheduleRaw> for ComputedSchedule {
    type Error = EngineError;

    fn try_from(raw: ComputedScheduleRaw) -> Result<Self, Self::Error> {
        if raw.jobs.is_empty() {
            return Err(EngineError::InvalidSchedule("schedule has no jobs".into()));
        }
        for (position, job) in raw.jobs.iter().enumerate() {
            if job.index != position {
                return Err(EngineError::InvalidSchedule(format!(
                    "job at position {position} has index {}",
                    job.index
                )));
            }
            if let Some(pred) = job.predecessor {
                if pred >= position {
                    return Err(EngineError::InvalidSchedule(format!(
                        "job {position} waits on job {pred}, which is not earlier"
                    )));
                }
            }
        }

        let schedule = Self::new(raw.batch_start, raw.jobs);
        if schedule.overall_due_date != raw.overall_due_date {
            return Err(EngineError::InvalidSchedule(format!(
                "overall due date {} is not the latest job due date {}",
                raw.overall_due_date, schedule.overall_due_date
            )));
        }
        Ok(schedule)
    }
}

impl ComputedSchedule {
    /// Builds a schedule; the overall due date is the latest job due date.
    ///
    /// An empty job list yields `batch_start` as overall due date.
    pub(crate) fn new(batch_start: NaiveDate, jobs: Vec<ScheduledJob>) -> Self {
        let overall_due_date = jobs
            .iter()
            .map(|j| j.due_date)
            .max()
            .unwrap_or(batch_start);
        Self {
            batch_start,
            jobs,
            overall_due_date,
        }
    }

    /// Calendar day of the batch start.
    pub fn batch_start(&self) -> NaiveDate {
        self.batch_start
    }

    /// Jobs in batch order.
    pub fn jobs(&self) -> &[ScheduledJob] {
        &self.jobs
    }

    /// Latest due date across all jobs.
    pub fn overall_due_date(&self) -> NaiveDate {
        self.overall_due_date
    }

    /// Job at `index`.
    pub fn job(&self, index: usize) -> Option<&ScheduledJob> {
        self.jobs.get(index)
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the schedule has no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Position of the job that sets the overall due date.
    ///
    /// Earliest position wins on ties.
    pub fn critical_job(&self) -> Option<usize> {
        self.jobs
            .iter()
            .find(|j| j.due_date == self.overall_due_date)
            .map(|j| j.index)
    }

    /// Chain of positions from a root job down to the critical job.
    pub fn critical_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cursor = self.critical_job();
        while let Some(index) = cursor {
            path.push(index);
            cursor = self.jobs.get(index).and_then(|j| j.predecessor);
        }
        path.reverse();
        path
    }

    /// Positions of jobs that wait on job `index`.
    pub fn successors(&self, index: usize) -> Vec<usize> {
        self.jobs
            .iter()
            .filter(|j| j.predecessor == Some(index))
            .map(|j| j.index)
            .collect()
    }

    /// Number of predecessor hops from a root to job `index`.
    pub fn chain_depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut cursor = self.jobs.get(index).and_then(|j| j.predecessor);
        while let Some(pred) = cursor {
            depth += 1;
            cursor = self.jobs.get(pred).and_then(|j| j.predecessor);
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn job(
        index: usize,
        predecessor: Option<usize>,
        start: NaiveDate,
        due: NaiveDate,
    ) -> ScheduledJob {
        ScheduledJob {
            index,
            label: format!("J{index}"),
            sla_working_days: 1,
            predecessor,
            start_date: start,
            due_date: due,
        }
    }

    fn sample_schedule() -> ComputedSchedule {
        ComputedSchedule::new(
            d(6, 3),
            vec![
                job(0, None, d(6, 3), d(6, 6)),
                job(1, Some(0), d(6, 6), d(6, 10)),
                job(2, None, d(6, 3), d(6, 5)),
                job(3, Some(2), d(6, 5), d(6, 10)),
            ],
        )
    }

    #[test]
    fn test_overall_due_date_is_max() {
        let s = sample_schedule();
        assert_eq!(s.overall_due_date(), d(6, 10));
        assert_eq!(s.batch_start(), d(6, 3));
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_critical_job_tie_takes_earliest() {
        let s = sample_schedule();
        assert_eq!(s.critical_job(), Some(1));
        assert_eq!(s.critical_path(), vec![0, 1]);
    }

    #[test]
    fn test_successors_and_depth() {
        let s = sample_schedule();
        assert_eq!(s.successors(0), vec![1]);
        assert_eq!(s.successors(1), Vec::<usize>::new());
        assert_eq!(s.chain_depth(0), 0);
        assert_eq!(s.chain_depth(3), 1);
    }

    #[test]
    fn test_schedule_serializes() {
        let s = sample_schedule();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["overall_due_date"], "2024-06-10");
        assert_eq!(json["jobs"][1]["start_date"], "2024-06-06");
    }

    #[test]
    fn test_schedule_deserializes_round_trip() {
        let s = sample_schedule();
        let json = serde_json::to_string(&s).unwrap();
        let back: ComputedSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.critical_path(), vec![0, 1]);
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut json = serde_json::to_value(sample_schedule()).unwrap();
        edit(&mut json);
        json.to_string()
    }

    #[test]
    fn test_deserialize_rejects_backward_cycle() {
        // 0 -> 1 -> 0 would loop chain_depth and critical_path forever.
        let json = tampered(|v| v["jobs"][0]["predecessor"] = 1.into());
        let err = serde_json::from_str::<ComputedSchedule>(&json).unwrap_err();
        assert!(err.to_string().contains("not earlier"));

        let json = tampered(|v| v["jobs"][2]["predecessor"] = 2.into());
        assert!(serde_json::from_str::<ComputedSchedule>(&json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_misplaced_index() {
        let json = tampered(|v| v["jobs"][3]["index"] = 7.into());
        let err = serde_json::from_str::<ComputedSchedule>(&json).unwrap_err();
        assert!(err.to_string().contains("position 3 has index 7"));
    }

    #[test]
    fn test_deserialize_rejects_wrong_overall_due() {
        let json = tampered(|v| v["overall_due_date"] = "2024-07-01".into());
        let err = serde_json::from_str::<ComputedSchedule>(&json).unwrap_err();
        assert!(err.to_string().contains("not the latest job due date"));
    }

    #[test]
    fn test_deserialize_rejects_empty_jobs() {
        let json = tampered(|v| v["jobs"] = serde_json::Value::Array(Vec::new()));
        let err = serde_json::from_str::<ComputedSchedule>(&json).unwrap_err();
        assert!(err.to_string().contains("no jobs"));
    }
}
