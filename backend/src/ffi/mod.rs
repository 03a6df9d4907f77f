//! Python bindings
//!
//! Compiled only with the `pyo3` feature. Configuration crosses the boundary
//! as a dict in the `ScenarioConfig` shape and results come back as plain
//! dicts and lists.

pub mod simulator;
pub mod types;
