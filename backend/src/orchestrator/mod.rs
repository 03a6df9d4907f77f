//! Orchestrator - main simulation loop
//!
//! Drives one scheduling policy over a task set, tick by tick.
//!
//! See `engine.rs` for full implementation.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{
    generate_and_simulate, PolicyConfig, PolicyParseError, ScenarioConfig, SimConfig,
    SimulationError, Simulator, TickResult,
};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, result_digest, validate_result, RunReport};
