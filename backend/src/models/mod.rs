//! Domain models for the scheduler simulator

pub mod event;
pub mod job;
pub mod result;
pub mod segment;
pub mod task;

// Re-exports
pub use event::{Event, EventLog};
pub use job::{Completion, Job, JobState};
pub use result::{RunSummary, SimResult};
pub use segment::{CpuState, Segment, IDLE_LABEL};
pub use task::{validate_task_set, Task, TaskError, TaskId};
