//! Round-Robin Policy
//!
//! Time-slices the processor among ready jobs with a fixed quantum.
//!
//! # Behavior
//!
//! On every call (one call per simulated tick):
//! 1. Admit newly eligible jobs at the back of the ready rotation, in
//!    job-index order (= release order)
//! 2. Drop finished jobs from the rotation
//! 3. Empty rotation → idle
//! 4. The job at the front keeps the processor until it has run `quantum`
//!    consecutive ticks; then the rotation advances exactly one position
//!    (the expired job moves to the back). If the previous job left the
//!    rotation (finished), the new front runs with a fresh quantum.
//!
//! # State
//!
//! The rotation lives in the policy instance. Build a fresh policy for each
//! run; reusing one across runs carries stale job indices.

use super::SchedulingPolicy;
use crate::models::Job;
use std::collections::VecDeque;

/// Round-robin policy with an owned ready rotation
///
/// # Example
///
/// ```
/// use sched_simulator_core_rs::policy::{RoundRobinPolicy, SchedulingPolicy};
/// use sched_simulator_core_rs::{Job, Task};
///
/// let task_a = Task::new(1, 100, 4, 100);
/// let task_b = Task::new(2, 100, 4, 100);
/// let jobs = vec![Job::release(&task_a, 1, 0), Job::release(&task_b, 1, 0)];
///
/// let mut rr = RoundRobinPolicy::new(2);
/// assert_eq!(rr.select_next(&jobs, 0), Some(0));
/// assert_eq!(rr.select_next(&jobs, 1), Some(0));
/// assert_eq!(rr.select_next(&jobs, 2), Some(1)); // quantum of 2 used up
/// ```
#[derive(Debug, Clone)]
pub struct RoundRobinPolicy {
    /// Consecutive ticks a job may hold the processor
    quantum: usize,
    /// Job selected on the previous call
    last_selected: Option<usize>,
    /// Ticks the previous job has run in its current quantum
    used: usize,
    /// Ready job indices; the front is the current holder
    ready: VecDeque<usize>,
}

impl RoundRobinPolicy {
    /// Create a round-robin policy
    ///
    /// # Panics
    /// Panics if `quantum` is zero. The simulator validates the quantum
    /// before building the policy.
    pub fn new(quantum: usize) -> Self {
        assert!(quantum > 0, "quantum must be positive");
        Self {
            quantum,
            last_selected: None,
            used: 0,
            ready: VecDeque::new(),
        }
    }

    pub fn quantum(&self) -> usize {
        self.quantum
    }

    /// Ready rotation, front first
    pub fn rotation(&self) -> Vec<usize> {
        self.ready.iter().copied().collect()
    }

    fn refresh_ready(&mut self, jobs: &[Job], tick: usize) {
        for (idx, job) in jobs.iter().enumerate() {
            if job.is_eligible(tick) && !self.ready.contains(&idx) {
                self.ready.push_back(idx);
            }
        }

        self.ready
            .retain(|&idx| jobs.get(idx).is_some_and(|job| job.remaining() > 0));
    }
}

impl SchedulingPolicy for RoundRobinPolicy {
    fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize> {
        self.refresh_ready(jobs, tick);

        let front = match self.ready.front() {
            Some(&idx) => idx,
            None => {
                self.last_selected = None;
                self.used = 0;
                return None;
            }
        };

        let mut fresh_quantum = self.last_selected != Some(front);
        if !fresh_quantum && self.used >= self.quantum {
            self.ready.rotate_left(1);
            fresh_quantum = true;
        }

        let selected = *self.ready.front()?;
        self.used = if fresh_quantum { 1 } else { self.used + 1 };
        self.last_selected = Some(selected);
        Some(selected)
    }

    fn name(&self) -> &'static str {
        "rr"
    }

    fn uses_quantum(&self) -> bool {
        true
    }

    fn enforced_quantum(&self) -> Option<usize> {
        Some(self.quantum)
    }
}
