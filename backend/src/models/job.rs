//! Job model
//!
//! A job is one release of a periodic task. Jobs are created once by the
//! arrival generator for the whole horizon and then mutated tick by tick by
//! the simulator. Each job has:
//! - Owning task and 1-based sequence number within that task
//! - Release tick and absolute deadline (release + relative deadline)
//! - Remaining work (non-increasing, floor 0)
//! - First-start and finish ticks (absent until they happen)
//! - Preemption count and deadline-missed flag
//!
//! # Lifecycle
//!
//! ```text
//! Unreleased -> Ready -> Running -> { Ready (preempted) | Finished }
//! ```
//!
//! Finished is terminal. The deadline-missed flag is set on the
//! Running -> Finished transition when finish > absolute deadline.

use crate::models::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduling-visible state of a job at a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Release tick not yet reached
    Unreleased,
    /// Released with work remaining
    Ready,
    /// All work done
    Finished,
}

/// One periodic instance of a task
///
/// # Example
/// ```
/// use sched_simulator_core_rs::{Job, Task};
///
/// let task = Task::new(2, 25, 8, 20);
/// let job = Job::release(&task, 3, 50);
/// assert_eq!(job.label(), "T2J3");
/// assert_eq!(job.abs_deadline(), 70);
/// assert_eq!(job.remaining(), 8);
/// assert!(job.start_tick().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    task_id: TaskId,
    seq: u32,
    release_tick: usize,
    abs_deadline: usize,
    wcet: usize,
    remaining: usize,
    start_tick: Option<usize>,
    finish_tick: Option<usize>,
    preemptions: u32,
    missed_deadline: bool,
}

/// Outcome of the unit of work that finished a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Tick at which the job finished (one past its last executed tick)
    pub finish_tick: usize,
    pub response_time: usize,
    pub missed_deadline: bool,
}

impl Job {
    /// Create the `seq`-th job of `task`, released at `release_tick`
    ///
    /// # Panics
    /// Panics on overflow of `release_tick + task.deadline`. The simulator
    /// rejects such task sets before generating jobs.
    pub fn release(task: &Task, seq: u32, release_tick: usize) -> Self {
        Self {
            task_id: task.id,
            seq,
            release_tick,
            abs_deadline: release_tick + task.deadline,
            wcet: task.wcet,
            remaining: task.wcet,
            start_tick: None,
            finish_tick: None,
            preemptions: 0,
            missed_deadline: false,
        }
    }

    /// Owning task identifier
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Sequence number within the task (1-based, release order)
    pub fn seq(&self) -> u32 {
        self.seq
    }

    pub fn release_tick(&self) -> usize {
        self.release_tick
    }

    pub fn abs_deadline(&self) -> usize {
        self.abs_deadline
    }

    /// Execution budget this job was released with
    pub fn wcet(&self) -> usize {
        self.wcet
    }

    /// Work still to be done
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Tick of first execution, if the job has run
    pub fn start_tick(&self) -> Option<usize> {
        self.start_tick
    }

    /// Tick at which the last unit of work completed, if finished
    pub fn finish_tick(&self) -> Option<usize> {
        self.finish_tick
    }

    pub fn preemptions(&self) -> u32 {
        self.preemptions
    }

    pub fn missed_deadline(&self) -> bool {
        self.missed_deadline
    }

    /// Human-readable label, e.g. `T1J3`
    pub fn label(&self) -> String {
        format!("T{}J{}", self.task_id, self.seq)
    }

    /// Ordering key used for deterministic tie-breaking
    pub fn identity(&self) -> (TaskId, u32) {
        (self.task_id, self.seq)
    }

    /// True if the job is released at `tick` and has work left
    pub fn is_eligible(&self, tick: usize) -> bool {
        self.remaining > 0 && self.release_tick <= tick
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Lifecycle state at `tick`
    pub fn state_at(&self, tick: usize) -> JobState {
        if self.remaining == 0 {
            JobState::Finished
        } else if self.release_tick > tick {
            JobState::Unreleased
        } else {
            JobState::Ready
        }
    }

    /// Finish tick minus release tick, for finished jobs only
    pub fn response_time(&self) -> Option<usize> {
        self.finish_tick.map(|finish| finish - self.release_tick)
    }

    /// Absolute deadline minus finish tick (negative means the deadline was missed)
    pub fn slack(&self) -> Option<i64> {
        self.finish_tick
            .map(|finish| self.abs_deadline as i64 - finish as i64)
    }

    /// Execute one unit of work at `tick`
    ///
    /// Records the first-start tick, decrements remaining work, and on
    /// completion stamps the finish tick and deadline flag. Returns the
    /// completion record if this unit finished the job.
    ///
    /// # Panics
    /// Panics if the job is not eligible at `tick`. The simulator checks
    /// eligibility before executing.
    pub fn execute_unit(&mut self, tick: usize) -> Option<Completion> {
        assert!(
            self.is_eligible(tick),
            "job {} executed while ineligible at tick {}",
            self.label(),
            tick
        );

        if self.start_tick.is_none() {
            self.start_tick = Some(tick);
        }

        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }

        let finish_tick = tick + 1;
        self.finish_tick = Some(finish_tick);
        self.missed_deadline = finish_tick > self.abs_deadline;
        Some(Completion {
            finish_tick,
            response_time: finish_tick - self.release_tick,
            missed_deadline: self.missed_deadline,
        })
    }

    /// Record that the processor switched away before this job finished
    pub fn record_preemption(&mut self) {
        self.preemptions += 1;
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
