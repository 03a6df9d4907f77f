//! Scheduling Policy Module
//!
//! This module defines the policy interface the simulator consults on every
//! tick to decide which job occupies the processor.
//!
//! # Overview
//!
//! A policy sees the full job collection and the current tick and returns
//! the index of the job to run, or `None` for an idle processor. A job is
//! eligible iff it is released (`release_tick <= tick`) and still has work.
//! Every policy applies a total order over eligible jobs, so identical input
//! always yields the identical schedule.
//!
//! # Policy Interface
//!
//! All policies implement the `SchedulingPolicy` trait:
//! ```rust
//! use sched_simulator_core_rs::policy::SchedulingPolicy;
//! use sched_simulator_core_rs::Job;
//!
//! struct LowestIndexFirst;
//!
//! impl SchedulingPolicy for LowestIndexFirst {
//!     fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize> {
//!         jobs.iter().position(|j| j.is_eligible(tick))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "lowest-index"
//!     }
//! }
//! ```
//!
//! Available policies:
//! 1. **Fcfs**: earliest release first
//! 2. **Edf**: earliest absolute deadline first (fully preemptive)
//! 3. **FixedPriority**: rate-monotonic, or explicit task priorities
//! 4. **RoundRobin**: quantum-based rotation over ready jobs (stateful)
//!
//! # Query Discipline
//!
//! The simulator queries the policy exactly once per tick, in increasing
//! tick order, and always runs the job it returns. Stateful policies
//! (round-robin) rely on this: each call is one simulated tick.

use crate::models::Job;

pub mod edf;
pub mod fcfs;
pub mod fixed_priority;
pub mod round_robin;

pub use edf::EdfPolicy;
pub use fcfs::FcfsPolicy;
pub use fixed_priority::FixedPriorityPolicy;
pub use round_robin::RoundRobinPolicy;

/// Decision function driven by the simulator once per tick
pub trait SchedulingPolicy {
    /// Index into `jobs` of the job that should run during `tick`,
    /// or `None` to leave the processor idle.
    fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize>;

    /// Short policy name (`fcfs`, `edf`, `rm`, `rr`)
    fn name(&self) -> &'static str;

    /// True if the policy enforces a time quantum. The simulator tracks
    /// quantum expiry for such policies.
    fn uses_quantum(&self) -> bool {
        false
    }

    /// Quantum the policy enforces itself, if it knows one. The simulator
    /// logs quantum expiry against this value and falls back to
    /// `SimConfig::rr_quantum` when it is `None`.
    fn enforced_quantum(&self) -> Option<usize> {
        None
    }
}

/// Adapter turning a closure into a `SchedulingPolicy`
///
/// # Example
///
/// ```
/// use sched_simulator_core_rs::policy::{FnPolicy, SchedulingPolicy};
/// use sched_simulator_core_rs::{Job, Task};
///
/// let mut last_released = FnPolicy::new("lifo", |jobs: &[Job], tick: usize| {
///     jobs.iter().rposition(|j| j.is_eligible(tick))
/// });
///
/// let task = Task::new(1, 5, 1, 5);
/// let jobs = vec![Job::release(&task, 1, 0), Job::release(&task, 2, 5)];
/// assert_eq!(last_released.select_next(&jobs, 5), Some(1));
/// assert_eq!(last_released.name(), "lifo");
/// ```
pub struct FnPolicy<F> {
    name: &'static str,
    select: F,
    uses_quantum: bool,
}

impl<F> FnPolicy<F>
where
    F: FnMut(&[Job], usize) -> Option<usize>,
{
    pub fn new(name: &'static str, select: F) -> Self {
        Self {
            name,
            select,
            uses_quantum: false,
        }
    }

    /// Mark the closure as quantum-driven (it manages its own rotation state)
    pub fn with_quantum(mut self) -> Self {
        self.uses_quantum = true;
        self
    }
}

impl<F> SchedulingPolicy for FnPolicy<F>
where
    F: FnMut(&[Job], usize) -> Option<usize>,
{
    fn select_next(&mut self, jobs: &[Job], tick: usize) -> Option<usize> {
        (self.select)(jobs, tick)
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn uses_quantum(&self) -> bool {
        self.uses_quantum
    }
}

/// Iterate eligible jobs together with their indices
pub fn eligible_jobs(jobs: &[Job], tick: usize) -> impl Iterator<Item = (usize, &Job)> {
    jobs.iter()
        .enumerate()
        .filter(move |(_, job)| job.is_eligible(tick))
}

/// Eligible job with the smallest key; keys must be unique to be a total order
pub(crate) fn select_min_by_key<K, F>(jobs: &[Job], tick: usize, key: F) -> Option<usize>
where
    K: Ord,
    F: Fn(&Job) -> K,
{
    eligible_jobs(jobs, tick)
        .min_by_key(|(_, job)| key(job))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn test_eligible_jobs_skips_unreleased_and_finished() {
        let task = Task::new(1, 5, 1, 5);
        let mut done = Job::release(&task, 1, 0);
        done.execute_unit(0);
        let ready = Job::release(&task, 2, 5);
        let future = Job::release(&task, 3, 10);
        let jobs = vec![done, ready, future];

        let indices: Vec<usize> = eligible_jobs(&jobs, 6).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_fn_policy_defaults_to_no_quantum() {
        let policy = FnPolicy::new("idle", |_: &[Job], _: usize| None);
        assert!(!policy.uses_quantum());
        assert!(policy.with_quantum().uses_quantum());
    }
}
