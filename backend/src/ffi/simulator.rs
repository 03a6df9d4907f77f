//! PyO3 wrapper for the simulation engine

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_scenario_config, tick_result_to_py, to_py_err, to_py_object};
use crate::models::SimResult;
use crate::orchestrator::Simulator as RustSimulator;

/// Run a whole scenario and return its result
///
/// # Example (from Python)
///
/// ```python
/// from sched_simulator_core_rs import simulate
///
/// out = simulate({
///     "sim": {"horizon": 30},
///     "policy": {"type": "Edf"},
///     "tasks": [{"id": 1, "period": 10, "wcet": 3, "deadline": 10}],
/// })
/// print(out["summary"]["missed"])
/// ```
#[pyfunction]
pub fn simulate(py: Python<'_>, config: &Bound<'_, PyDict>) -> PyResult<Py<PyDict>> {
    let scenario = parse_scenario_config(config)?;
    let result = scenario.run().map_err(to_py_err)?;
    result_to_py(py, &result)
}

fn result_to_py(py: Python<'_>, result: &SimResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("timeline", to_py_object(py, &result.timeline)?)?;
    dict.set_item("jobs", to_py_object(py, &result.jobs)?)?;
    dict.set_item("summary", to_py_object(py, &result.summary())?)?;
    Ok(dict.unbind())
}

/// Step-by-step simulator
///
/// The policy is a boxed trait object without a `Send` bound, so the class
/// is pinned to the thread that created it.
#[pyclass(name = "Simulator", unsendable)]
pub struct PySimulator {
    inner: Option<RustSimulator>,
}

impl PySimulator {
    fn inner_mut(&mut self) -> PyResult<&mut RustSimulator> {
        self.inner
            .as_mut()
            .ok_or_else(|| PyRuntimeError::new_err("Simulator already finished"))
    }
}

#[pymethods]
impl PySimulator {
    /// Build a simulator from a scenario dict
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let scenario = parse_scenario_config(config)?;
        let sim = scenario.effective_sim_config();
        let policy = scenario.policy.build(&scenario.tasks, &sim).map_err(to_py_err)?;
        let inner = RustSimulator::new(&scenario.tasks, &sim, policy).map_err(to_py_err)?;
        Ok(Self { inner: Some(inner) })
    }

    /// Advance one tick
    ///
    /// Returns a dict with `tick`, `occupant`, `completed`, `deadline_missed`.
    fn tick(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let result = self.inner_mut()?.tick().map_err(to_py_err)?;
        tick_result_to_py(py, &result)
    }

    fn current_tick(&mut self) -> PyResult<usize> {
        Ok(self.inner_mut()?.current_tick())
    }

    fn is_finished(&mut self) -> PyResult<bool> {
        Ok(self.inner_mut()?.is_finished())
    }

    /// Event log so far, as a list of dicts
    fn events(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let log = self.inner_mut()?.event_log();
        to_py_object(py, &log.events())
    }

    /// Run to the horizon and return the result dict
    ///
    /// The simulator cannot be used afterwards.
    fn finish(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let inner = self
            .inner
            .take()
            .ok_or_else(|| PyRuntimeError::new_err("Simulator already finished"))?;
        let result = inner.finish().map_err(to_py_err)?;
        result_to_py(py, &result)
    }
}
