//! FCFS (First-Come-First-Served) Policy
//!
//! Simplest baseline policy: run the earliest-released eligible job.
//!
//! # Behavior
//!
//! - Selects the eligible job with the smallest release tick
//! - Ties broken by (task id, sequence number) ascending
//! - Never preempts in favor of a later release: a running job keeps the
//!   processor until it finishes, since nothing released later can sort
//!   before it
//!
//! # Use Case
//!
//! - Baseline for comparison with deadline- and priority-driven policies
//! - Demonstrates deadline misses under overload

use super::{select_min_by_key, SchedulingPolicy};
use crate::models::Job;

/// FCFS policy: earliest release first
///
/// # Example
///
/// ```
/// use sched_simulator_core_rs::policy::{FcfsPolicy, SchedulingPolicy};
/// use sched_simulator_core_rs::{Job, Task};
///
/// let short = Task::new(1, 100, 1, 5);
/// let long = Task::new(2, 100, 9, 50);
/// let jobs = vec![Job::release(&long, 1, 0), Job::release(&short, 1, 2)];
///
/// let mut policy = FcfsPolicy::new();
/// assert_eq!(policy.select_next(&jobs, 3), Some(0)); // released first
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FcfsPolicy;

impl FcfsPolicy {
    /// Create new FCFS policy
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for FcfsPolicy {
    fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize> {
        select_min_by_key(jobs, tick, |job| {
            (job.release_tick(), job.task_id(), job.seq())
        })
    }

    fn name(&self) -> &'static str {
        "fcfs"
    }
}
