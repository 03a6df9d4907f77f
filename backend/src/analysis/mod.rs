//! Schedulability and response-time analysis.
//!
//! Two families of helpers:
//! - **Static** (task set only): total utilization, hyperperiod, the
//!   Liu & Layland rate-monotonic bound, the EDF utilization test
//! - **Empirical** (completed run): per-task response time, jitter, slack,
//!   misses and preemptions
//!
//! # Theory
//!
//! **Liu & Layland (1973)**: `n` independent implicit-deadline periodic
//! tasks are schedulable under rate-monotonic priorities on one processor if
//!
//! ```text
//! U = Σ C_i / T_i  <=  n (2^(1/n) - 1)
//! ```
//!
//! The bound is sufficient, not necessary: a set between the bound and 1.0
//! may or may not be schedulable, and the simulation decides. EDF schedules
//! any implicit-deadline set with `U <= 1`.

use crate::models::{Job, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sum of per-task utilizations
pub fn total_utilization(tasks: &[Task]) -> f64 {
    tasks.iter().map(Task::utilization).sum()
}

/// Least common multiple of all periods, None if a period is zero or the
/// value overflows
pub fn hyperperiod(tasks: &[Task]) -> Option<usize> {
    tasks.iter().try_fold(1usize, |acc, task| {
        if task.period == 0 {
            return None;
        }
        let g = gcd(acc, task.period);
        (acc / g).checked_mul(task.period)
    })
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Liu & Layland utilisation bound for `n` tasks, `n (2^(1/n) - 1)`
///
/// Returns `0.0` for `n = 0` and `1.0` for `n = 1`.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

/// Outcome of the rate-monotonic utilization test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RmBoundCheck {
    pub utilization: f64,
    pub bound: f64,
    /// U <= bound: schedulable under RM
    pub guaranteed: bool,
    /// U > 1: unschedulable under any policy
    pub overloaded: bool,
}

/// Compare a task set's utilization to the Liu & Layland bound
///
/// # Example
///
/// ```
/// use sched_simulator_core_rs::analysis::rm_bound_check;
/// use sched_simulator_core_rs::Task;
///
/// let tasks = vec![Task::new(1, 10, 3, 10), Task::new(2, 25, 8, 25), Task::new(3, 40, 6, 40)];
/// let check = rm_bound_check(&tasks);
/// assert!(check.guaranteed); // 0.77 <= 0.7798
/// assert!(!check.overloaded);
/// ```
pub fn rm_bound_check(tasks: &[Task]) -> RmBoundCheck {
    let utilization = total_utilization(tasks);
    let bound = liu_layland_bound(tasks.len());
    RmBoundCheck {
        utilization,
        bound,
        guaranteed: utilization <= bound,
        overloaded: utilization > 1.0,
    }
}

/// EDF utilization test; exact for implicit deadlines (deadline == period)
pub fn edf_feasible(tasks: &[Task]) -> bool {
    total_utilization(tasks) <= 1.0
}

/// Empirical statistics for one task over a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatistics {
    pub task_id: TaskId,
    pub released: usize,
    pub finished: usize,
    pub missed: usize,
    pub preemptions: usize,
    pub min_response: Option<usize>,
    pub max_response: Option<usize>,
    pub mean_response: Option<f64>,
    /// max_response - min_response over finished jobs
    pub jitter: Option<usize>,
    /// Smallest deadline - finish over finished jobs; negative = miss
    pub worst_slack: Option<i64>,
}

impl TaskStatistics {
    fn empty(task_id: TaskId) -> Self {
        Self {
            task_id,
            released: 0,
            finished: 0,
            missed: 0,
            preemptions: 0,
            min_response: None,
            max_response: None,
            mean_response: None,
            jitter: None,
            worst_slack: None,
        }
    }
}

/// Per-task statistics for a completed job collection, sorted by task id
pub fn task_statistics(jobs: &[Job]) -> Vec<TaskStatistics> {
    let mut by_task: BTreeMap<TaskId, Vec<&Job>> = BTreeMap::new();
    for job in jobs {
        by_task.entry(job.task_id()).or_default().push(job);
    }

    by_task
        .into_iter()
        .map(|(task_id, jobs)| {
            let mut stats = TaskStatistics::empty(task_id);
            stats.released = jobs.len();
            stats.missed = jobs.iter().filter(|j| j.missed_deadline()).count();
            stats.preemptions = jobs.iter().map(|j| j.preemptions() as usize).sum();

            let responses: Vec<usize> = jobs.iter().filter_map(|j| j.response_time()).collect();
            stats.finished = responses.len();
            stats.min_response = responses.iter().copied().min();
            stats.max_response = responses.iter().copied().max();
            if !responses.is_empty() {
                let total: usize = responses.iter().sum();
                stats.mean_response = Some(total as f64 / responses.len() as f64);
            }
            stats.jitter = stats
                .max_response
                .zip(stats.min_response)
                .map(|(max, min)| max - min);
            stats.worst_slack = jobs.iter().filter_map(|j| j.slack()).min();
            stats
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_zero_tasks_is_zero() {
        assert_eq!(liu_layland_bound(0), 0.0);
    }

    #[test]
    fn bound_one_task_is_one() {
        let b = liu_layland_bound(1);
        assert!((b - 1.0).abs() < 1e-10, "bound(1) should be 1.0, got {b}");
    }

    #[test]
    fn bound_two_tasks() {
        assert!((liu_layland_bound(2) - 0.828_427).abs() < 1e-5);
    }

    #[test]
    fn hyperperiod_is_lcm_of_periods() {
        let tasks = vec![
            Task::new(1, 10, 1, 10),
            Task::new(2, 25, 1, 25),
            Task::new(3, 40, 1, 40),
        ];
        assert_eq!(hyperperiod(&tasks), Some(200));
        assert_eq!(hyperperiod(&[Task::new(1, 0, 1, 1)]), None);
    }

    #[test]
    fn overloaded_set_is_not_edf_feasible() {
        let tasks = vec![Task::new(1, 4, 3, 4), Task::new(2, 6, 3, 6)];
        assert!(!edf_feasible(&tasks));
        assert!(rm_bound_check(&tasks).overloaded);
    }

    #[test]
    fn statistics_report_jitter_and_slack() {
        let task = Task::new(1, 10, 2, 6);
        let mut fast = Job::release(&task, 1, 0);
        fast.execute_unit(0);
        fast.execute_unit(1); // response 2, slack 4
        let mut slow = Job::release(&task, 2, 10);
        slow.execute_unit(15);
        slow.execute_unit(16); // response 7, slack -1
        let pending = Job::release(&task, 3, 20);

        let stats = task_statistics(&[fast, slow, pending]);
        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.released, 3);
        assert_eq!(s.finished, 2);
        assert_eq!(s.missed, 1);
        assert_eq!(s.min_response, Some(2));
        assert_eq!(s.max_response, Some(7));
        assert_eq!(s.jitter, Some(5));
        assert_eq!(s.worst_slack, Some(-1));
        assert_eq!(s.mean_response, Some(4.5));
    }
}
