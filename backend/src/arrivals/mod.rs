//! Job arrival generation.
//!
//! Expands a periodic task set into every job released over the simulated
//! horizon. Generation happens once, up front: the simulator receives the
//! complete job collection before the first tick.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same task set + same horizon → same jobs, same order
//! 2. **Strict periodicity**: task `t` releases at `phase + k * period` for
//!    every `k` with release `< horizon`
//! 3. **Cosmetic ordering**: output is sorted by (release, task id, sequence);
//!    the order does not encode priority
//!
//! # Example
//!
//! ```
//! use sched_simulator_core_rs::arrivals::generate_jobs;
//! use sched_simulator_core_rs::Task;
//!
//! let tasks = vec![Task::new(1, 10, 3, 10), Task::new(2, 25, 8, 25).with_phase(5)];
//! let jobs = generate_jobs(&tasks, 30);
//!
//! let labels: Vec<String> = jobs.iter().map(|j| j.label()).collect();
//! assert_eq!(labels, vec!["T1J1", "T2J1", "T1J2", "T1J3"]);
//! ```

use crate::models::{Job, Task};

/// Generate every job released in `[task.phase, horizon)` for each task.
///
/// Tasks must already be validated (positive period); a zero period would
/// never advance. Tasks whose phase is at or beyond the horizon yield no jobs.
pub fn generate_jobs(tasks: &[Task], horizon: usize) -> Vec<Job> {
    let mut jobs: Vec<Job> = tasks
        .iter()
        .flat_map(|task| releases(task, horizon))
        .collect();

    jobs.sort_by_key(|j| (j.release_tick(), j.task_id(), j.seq()));
    jobs
}

/// Jobs of a single task, in release order
fn releases(task: &Task, horizon: usize) -> impl Iterator<Item = Job> + '_ {
    (task.phase..horizon)
        .step_by(task.period.max(1))
        .zip(1u32..)
        .map(move |(release, seq)| Job::release(task, seq, release))
}

/// Number of jobs `task` releases before `horizon`, without generating them
pub fn release_count(task: &Task, horizon: usize) -> usize {
    if task.phase >= horizon || task.period == 0 {
        return 0;
    }
    (horizon - task.phase).div_ceil(task.period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_task_releases_on_period() {
        let jobs = generate_jobs(&[Task::new(1, 10, 3, 10)], 30);
        let releases: Vec<usize> = jobs.iter().map(|j| j.release_tick()).collect();
        assert_eq!(releases, vec![0, 10, 20]);
        assert_eq!(jobs[2].seq(), 3);
        assert_eq!(jobs[2].abs_deadline(), 30);
        assert_eq!(jobs[2].remaining(), 3);
    }

    #[test]
    fn test_phase_at_horizon_generates_nothing() {
        let task = Task::new(1, 10, 3, 10).with_phase(30);
        assert!(generate_jobs(&[task.clone()], 30).is_empty());
        assert_eq!(release_count(&task, 30), 0);
    }

    #[test]
    fn test_simultaneous_releases_sorted_by_task_id() {
        let tasks = vec![Task::new(9, 5, 1, 5), Task::new(2, 5, 1, 5)];
        let jobs = generate_jobs(&tasks, 5);
        assert_eq!(jobs[0].task_id(), 2);
        assert_eq!(jobs[1].task_id(), 9);
    }

    #[test]
    fn test_release_count_matches_generation() {
        let task = Task::new(1, 7, 2, 7).with_phase(3);
        let generated = generate_jobs(&[task.clone()], 50).len();
        assert_eq!(release_count(&task, 50), generated);
        assert_eq!(generated, 7); // 3, 10, 17, 24, 31, 38, 45
    }
}
