//! Task model
//!
//! A task is an immutable descriptor of a periodic workload. Each task has:
//! - Identifier (unique within a task set)
//! - Period (ticks between successive job releases)
//! - Worst-case execution time (work per job, in ticks)
//! - Relative deadline (ticks after release by which a job must finish)
//! - Phase (offset of the first release)
//! - Optional fixed priority (0 = derive from period)
//!
//! A deadline shorter than the execution time is accepted: such jobs always
//! miss, and every policy must tolerate them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Task identifier
pub type TaskId = u32;

/// Errors detected when validating a task set
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task {task_id}: period must be positive")]
    ZeroPeriod { task_id: TaskId },

    #[error("Task {task_id}: worst-case execution time must be positive")]
    ZeroExecutionTime { task_id: TaskId },

    #[error("Duplicate task id {task_id}")]
    DuplicateId { task_id: TaskId },

    #[error("Task set is empty")]
    EmptyTaskSet,
}

/// Periodic real-time task descriptor
///
/// # Example
/// ```
/// use sched_simulator_core_rs::Task;
///
/// let task = Task::new(1, 10, 3, 10).with_phase(5);
/// assert_eq!(task.effective_priority(), 10); // rate-monotonic: period
/// assert!((task.utilization() - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,

    /// Ticks between successive releases
    pub period: usize,

    /// Worst-case execution time per job (ticks)
    pub wcet: usize,

    /// Relative deadline (ticks after release)
    pub deadline: usize,

    /// Release offset of the first job
    #[serde(default)]
    pub phase: usize,

    /// Fixed priority, smaller is more urgent. 0 derives it from the period.
    #[serde(default)]
    pub priority: u32,
}

impl Task {
    /// Create a task with zero phase and derived priority
    pub fn new(id: TaskId, period: usize, wcet: usize, deadline: usize) -> Self {
        Self {
            id,
            period,
            wcet,
            deadline,
            phase: 0,
            priority: 0,
        }
    }

    /// Set phase (builder pattern)
    pub fn with_phase(mut self, phase: usize) -> Self {
        self.phase = phase;
        self
    }

    /// Set an explicit fixed priority (builder pattern)
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Priority used by fixed-priority scheduling
    ///
    /// The explicit priority when nonzero, otherwise the period
    /// (shorter period = more urgent).
    pub fn effective_priority(&self) -> usize {
        if self.priority != 0 {
            self.priority as usize
        } else {
            self.period
        }
    }

    /// Processor share demanded by this task (wcet / period)
    pub fn utilization(&self) -> f64 {
        if self.period == 0 {
            return 0.0;
        }
        self.wcet as f64 / self.period as f64
    }

    /// Check the structural invariants of a single task
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.period == 0 {
            return Err(TaskError::ZeroPeriod { task_id: self.id });
        }
        if self.wcet == 0 {
            return Err(TaskError::ZeroExecutionTime { task_id: self.id });
        }
        Ok(())
    }
}

/// Validate a whole task set: non-empty, every task valid, ids unique
pub fn validate_task_set(tasks: &[Task]) -> Result<(), TaskError> {
    if tasks.is_empty() {
        return Err(TaskError::EmptyTaskSet);
    }

    let mut seen = HashSet::new();
    for task in tasks {
        task.validate()?;
        if !seen.insert(task.id) {
            return Err(TaskError::DuplicateId { task_id: task.id });
        }
    }

    Ok(())
}
