//! Fixed-Priority (Rate-Monotonic) Policy
//!
//! Each task carries a static priority for the whole run. Smaller value
//! means more urgent.
//!
//! # Behavior
//!
//! - Effective priority = the task's explicit priority if nonzero,
//!   otherwise its period (rate-monotonic: shorter period wins)
//! - Selects the eligible job with the smallest effective priority
//! - Ties broken by (release tick, task id, sequence number) ascending
//!
//! # Parameters
//!
//! - The task set, snapshotted at construction into a priority table

use super::{select_min_by_key, SchedulingPolicy};
use crate::models::{Job, Task, TaskId};
use std::collections::HashMap;

/// Fixed-priority policy over a static task set
///
/// # Example
///
/// ```
/// use sched_simulator_core_rs::policy::{FixedPriorityPolicy, SchedulingPolicy};
/// use sched_simulator_core_rs::{Job, Task};
///
/// let tasks = vec![Task::new(1, 40, 5, 40), Task::new(2, 10, 2, 10)];
/// let jobs = vec![Job::release(&tasks[0], 1, 0), Job::release(&tasks[1], 1, 0)];
///
/// let mut rm = FixedPriorityPolicy::new(&tasks);
/// assert_eq!(rm.select_next(&jobs, 0), Some(1)); // period 10 beats period 40
/// ```
#[derive(Debug, Clone)]
pub struct FixedPriorityPolicy {
    /// Task id → effective priority
    priorities: HashMap<TaskId, usize>,
}

impl FixedPriorityPolicy {
    /// Build the priority table from a task set
    pub fn new(tasks: &[Task]) -> Self {
        let priorities = tasks
            .iter()
            .map(|t| (t.id, t.effective_priority()))
            .collect();
        Self { priorities }
    }

    /// Effective priority of a task; unknown tasks rank last
    pub fn priority_of(&self, task_id: TaskId) -> usize {
        self.priorities.get(&task_id).copied().unwrap_or(usize::MAX)
    }
}

impl SchedulingPolicy for FixedPriorityPolicy {
    fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize> {
        select_min_by_key(jobs, tick, |job| {
            (
                self.priority_of(job.task_id()),
                job.release_tick(),
                job.task_id(),
                job.seq(),
            )
        })
    }

    fn name(&self) -> &'static str {
        "rm"
    }
}
