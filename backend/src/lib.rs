//! Scheduling Simulator Core - Rust Engine
//!
//! Discrete-time simulator of single-processor scheduling policies for
//! periodic real-time task sets, with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Time management
//! - **models**: Domain types (Task, Job, Segment, SimResult, Event)
//! - **arrivals**: Job generation from periodic tasks
//! - **policy**: Scheduling policies (FCFS, EDF, RM, round-robin)
//! - **orchestrator**: Tick loop, configuration, result validation
//! - **analysis**: Schedulability bounds and per-task statistics
//! - **export**: CSV and JSON writers
//!
//! # Critical Invariants
//!
//! 1. Time advances in whole ticks; nothing happens between ticks
//! 2. No randomness: same tasks, config and policy give the same result
//! 3. FFI boundary is minimal and safe

// Module declarations
pub mod analysis;
pub mod arrivals;
pub mod core;
pub mod export;
pub mod models;
pub mod orchestrator;
pub mod policy;

// Re-exports for convenience
pub use arrivals::generate_jobs;
pub use core::time::TimeManager;
pub use models::{
    event::{Event, EventLog},
    job::{Completion, Job, JobState},
    result::{RunSummary, SimResult},
    segment::{CpuState, Segment},
    task::{Task, TaskError, TaskId},
};
pub use orchestrator::{
    generate_and_simulate, PolicyConfig, ScenarioConfig, SimConfig, SimulationError, Simulator,
    TickResult,
};
pub use policy::SchedulingPolicy;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn sched_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::simulator::simulate, m)?)?;
    m.add_class::<ffi::simulator::PySimulator>()?;
    Ok(())
}
