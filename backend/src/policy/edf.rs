//! Earliest-Deadline-First Policy
//!
//! Runs the eligible job whose absolute deadline is nearest.
//!
//! # Behavior
//!
//! - Selects the eligible job with the smallest absolute deadline
//! - Ties broken by (task id, sequence number) ascending
//! - Fully preemptive: a newly released job with an earlier deadline takes
//!   the processor from the running job on the tick it is released
//!
//! # Use Case
//!
//! - Optimal on one processor for implicit-deadline task sets with U <= 1
//! - Reference point for fixed-priority schedulability

use super::{select_min_by_key, SchedulingPolicy};
use crate::models::Job;

/// EDF policy: earliest absolute deadline first
#[derive(Debug, Clone, Copy, Default)]
pub struct EdfPolicy;

impl EdfPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for EdfPolicy {
    fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize> {
        select_min_by_key(jobs, tick, |job| {
            (job.abs_deadline(), job.task_id(), job.seq())
        })
    }

    fn name(&self) -> &'static str {
        "edf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn test_edf_prefers_nearest_deadline_over_release_order() {
        let jobs = vec![
            Job::release(&Task::new(1, 50, 10, 50), 1, 0), // deadline 50
            Job::release(&Task::new(2, 10, 2, 8), 1, 3),   // deadline 11
        ];
        let mut policy = EdfPolicy::new();
        assert_eq!(policy.select_next(&jobs, 2), Some(0));
        assert_eq!(policy.select_next(&jobs, 3), Some(1));
    }

    #[test]
    fn test_edf_equal_deadlines_use_task_then_seq() {
        let slow = Task::new(4, 5, 1, 10);
        let fast = Task::new(2, 10, 1, 5);
        let jobs = vec![
            Job::release(&slow, 2, 5), // deadline 15
            Job::release(&slow, 1, 0), // deadline 10
            Job::release(&fast, 1, 5), // deadline 10
        ];
        assert_eq!(EdfPolicy::new().select_next(&jobs, 5), Some(2));
    }
}
