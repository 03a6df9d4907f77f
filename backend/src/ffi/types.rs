//! Type conversion utilities for FFI boundary
//!
//! Dicts are converted through Python's `json` module so the serde
//! representations of `ScenarioConfig` and `SimResult` stay the single
//! source of truth for field names.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use serde::Serialize;

use crate::orchestrator::{ScenarioConfig, SimulationError, TickResult};

/// Convert a simulation error into the matching Python exception
///
/// Configuration problems raise `ValueError`, everything else
/// `RuntimeError`.
pub fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::InvalidConfig(_)
        | SimulationError::InvalidTask(_)
        | SimulationError::Serialization(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Parse a scenario dict
pub fn parse_scenario_config(config: &Bound<'_, PyDict>) -> PyResult<ScenarioConfig> {
    let json = PyModule::import_bound(config.py(), "json")?;
    let text: String = json.call_method1("dumps", (config,))?.extract()?;
    ScenarioConfig::from_json_str(&text).map_err(to_py_err)
}

/// Convert any serializable value to the equivalent Python object
pub fn to_py_object<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let text = serde_json::to_string(value)
        .map_err(|e| PyRuntimeError::new_err(format!("Result serialization failed: {}", e)))?;
    let json = PyModule::import_bound(py, "json")?;
    Ok(json.call_method1("loads", (text,))?.unbind())
}

/// Convert a tick result to a dict
pub fn tick_result_to_py(py: Python<'_>, result: &TickResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("tick", result.tick)?;
    dict.set_item("occupant", result.occupant)?;
    dict.set_item("completed", result.completed)?;
    dict.set_item("deadline_missed", result.deadline_missed)?;
    Ok(dict.unbind())
}
