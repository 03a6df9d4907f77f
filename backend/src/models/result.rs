//! Simulation output
//!
//! `SimResult` is the sole artifact of a run: the job collection with final
//! statistics, and the segment timeline. `RunSummary` condenses it into the
//! counts printed after a run.

use crate::models::job::Job;
use crate::models::segment::Segment;
use crate::models::task::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completed simulation: final job statistics plus the processor timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimResult {
    /// Every generated job, in generation order
    pub jobs: Vec<Job>,
    /// Segments partitioning `[0, horizon)` in time order
    pub timeline: Vec<Segment>,
}

impl SimResult {
    /// Look up a job by task id and sequence number
    pub fn job(&self, task_id: TaskId, seq: u32) -> Option<&Job> {
        self.jobs
            .iter()
            .find(|j| j.task_id() == task_id && j.seq() == seq)
    }

    /// Jobs that finished after their absolute deadline
    pub fn missed_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| j.missed_deadline())
    }

    /// End of the last segment (the simulated horizon)
    pub fn horizon(&self) -> usize {
        self.timeline.last().map(|s| s.end).unwrap_or(0)
    }

    /// Aggregate counts over the run
    pub fn summary(&self) -> RunSummary {
        let finished = self.jobs.iter().filter(|j| j.is_finished()).count();
        let idle_ticks = self
            .timeline
            .iter()
            .filter(|s| s.is_idle())
            .map(Segment::duration)
            .sum();
        let busy_ticks = self
            .timeline
            .iter()
            .filter(|s| !s.is_idle())
            .map(Segment::duration)
            .sum();

        RunSummary {
            total: self.jobs.len(),
            finished,
            unfinished: self.jobs.len() - finished,
            missed: self.missed_jobs().count(),
            preemptions: self.jobs.iter().map(|j| j.preemptions() as usize).sum(),
            busy_ticks,
            idle_ticks,
        }
    }
}

/// Aggregate statistics of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub finished: usize,
    /// Jobs still holding work at the horizon
    pub unfinished: usize,
    pub missed: usize,
    pub preemptions: usize,
    pub busy_ticks: usize,
    pub idle_ticks: usize,
}

impl RunSummary {
    /// Busy ticks over the horizon, 0.0 for an empty timeline
    pub fn processor_utilization(&self) -> f64 {
        let horizon = self.busy_ticks + self.idle_ticks;
        if horizon == 0 {
            return 0.0;
        }
        self.busy_ticks as f64 / horizon as f64
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Jobs total: {} | finished: {} | unfinished: {} | missed: {} | preemptions: {} | busy: {:.1}%",
            self.total,
            self.finished,
            self.unfinished,
            self.missed,
            self.preemptions,
            self.processor_utilization() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Task;

    #[test]
    fn test_summary_counts() {
        let task = Task::new(1, 10, 1, 1);
        let mut late = Job::release(&task, 1, 0);
        late.execute_unit(1);
        let pending = Job::release(&task, 2, 10);

        let result = SimResult {
            jobs: vec![late, pending],
            timeline: vec![
                Segment::idle(0, 1),
                Segment::run(1, 2, "T1J1"),
                Segment::idle(2, 20),
            ],
        };

        let summary = result.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.finished, 1);
        assert_eq!(summary.unfinished, 1);
        assert_eq!(summary.missed, 1);
        assert_eq!(summary.busy_ticks, 1);
        assert_eq!(summary.idle_ticks, 19);
        assert_eq!(result.horizon(), 20);
        assert!(result.job(1, 2).is_some());
    }
}
