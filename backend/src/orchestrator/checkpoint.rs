//! Checkpoint - Save/Load Simulation Reports
//!
//! Serializes a completed run together with the configuration that
//! produced it, and checks completed results against the simulation
//! invariants.
//!
//! # Critical Invariants
//!
//! - **Determinism**: Same scenario produces an identical result digest
//! - **Segment Partition**: Segments cover `[0, horizon)` contiguously
//! - **Job Conservation**: Every generated job appears exactly once
//! - **Config Matching**: A report can only be verified against its own config

use crate::arrivals::generate_jobs;
use crate::models::{Job, RunSummary, SimResult, Task};
use crate::orchestrator::engine::check_deadline_range;
use crate::orchestrator::{ScenarioConfig, SimConfig, SimulationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

// ============================================================================
// Report Structures
// ============================================================================

/// Completed run plus the configuration that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Short policy name
    pub policy: String,

    /// SHA256 hash of the scenario (for validation)
    pub config_hash: String,

    /// Effective simulation parameters
    pub sim: SimConfig,

    pub tasks: Vec<Task>,

    pub summary: RunSummary,

    pub result: SimResult,
}

impl RunReport {
    /// Build a report for `result`, produced by running `scenario`
    pub fn new(scenario: &ScenarioConfig, result: SimResult) -> Result<Self, SimulationError> {
        Ok(Self {
            policy: scenario.policy.name().to_string(),
            config_hash: compute_config_hash(scenario)?,
            sim: scenario.effective_sim_config(),
            tasks: scenario.tasks.clone(),
            summary: result.summary(),
            result,
        })
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SimulationError::Serialization(format!("Report serialization failed: {}", e))
        })
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::Serialization(format!("Report deserialization failed: {}", e))
        })
    }

    /// Check that this report was produced by `scenario` and is internally valid
    pub fn verify_against(&self, scenario: &ScenarioConfig) -> Result<(), SimulationError> {
        let expected = compute_config_hash(scenario)?;
        if expected != self.config_hash {
            return Err(SimulationError::InvalidConfig(format!(
                "Config hash mismatch: report has {}, scenario hashes to {}",
                self.config_hash, expected
            )));
        }

        validate_result(&self.tasks, &self.sim, &self.result)?;

        if self.summary != self.result.summary() {
            return Err(SimulationError::ResultValidation(
                "Summary does not match job statistics".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys to ensure
/// deterministic hashing regardless of map iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    Ok(sha256_hex(json.as_bytes()))
}

/// SHA256 of the JSON encoding of a result; equal runs give equal digests
pub fn result_digest(result: &SimResult) -> Result<String, SimulationError> {
    let json = serde_json::to_vec(result).map_err(|e| {
        SimulationError::Serialization(format!("Result serialization failed: {}", e))
    })?;
    Ok(sha256_hex(&json))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate a completed result against the run that should have produced it
///
/// Checks critical invariants:
/// - Segment partition of `[0, horizon)`
/// - Job conservation against a fresh generation
/// - Per-job consistency (remaining work, finish tick, deadline flag)
/// - Executed ticks per job equal to its consumed work
pub fn validate_result(
    tasks: &[Task],
    config: &SimConfig,
    result: &SimResult,
) -> Result<(), SimulationError> {
    validate_timeline(config.horizon, result)?;
    check_deadline_range(tasks, config.horizon)?;
    validate_conservation(tasks, config.horizon, &result.jobs)?;

    for job in &result.jobs {
        validate_job(job)?;
    }

    validate_executed_work(result)
}

/// 1. Segments contiguous, non-empty, in order, covering exactly [0, horizon)
fn validate_timeline(horizon: usize, result: &SimResult) -> Result<(), SimulationError> {
    let mut cursor = 0;
    for (i, segment) in result.timeline.iter().enumerate() {
        if segment.start != cursor {
            return Err(SimulationError::ResultValidation(format!(
                "Segment {} starts at {} but previous segment ended at {}",
                i, segment.start, cursor
            )));
        }
        if segment.end <= segment.start {
            return Err(SimulationError::ResultValidation(format!(
                "Segment {} is empty or reversed: [{}, {})",
                i, segment.start, segment.end
            )));
        }
        if i > 0 && result.timeline[i - 1].label == segment.label {
            return Err(SimulationError::ResultValidation(format!(
                "Segments {} and {} both hold {} and should be merged",
                i - 1,
                i,
                segment.label
            )));
        }
        cursor = segment.end;
    }

    if cursor != horizon {
        return Err(SimulationError::ResultValidation(format!(
            "Timeline covers [0, {}) but horizon is {}",
            cursor, horizon
        )));
    }

    Ok(())
}

/// 2. Exactly the generated jobs, each once
fn validate_conservation(
    tasks: &[Task],
    horizon: usize,
    jobs: &[Job],
) -> Result<(), SimulationError> {
    let mut seen = HashSet::new();
    for job in jobs {
        if !seen.insert(job.identity()) {
            return Err(SimulationError::ResultValidation(format!(
                "Duplicate job {}",
                job.label()
            )));
        }
    }

    let expected = generate_jobs(tasks, horizon);
    if expected.len() != jobs.len() {
        return Err(SimulationError::ResultValidation(format!(
            "Expected {} jobs, result has {}",
            expected.len(),
            jobs.len()
        )));
    }

    for original in &expected {
        let matching = jobs.iter().find(|j| j.identity() == original.identity());
        match matching {
            Some(job)
                if job.release_tick() == original.release_tick()
                    && job.abs_deadline() == original.abs_deadline()
                    && job.wcet() == original.wcet() => {}
            Some(job) => {
                return Err(SimulationError::ResultValidation(format!(
                    "Job {} release/deadline/budget differ from its task",
                    job.label()
                )));
            }
            None => {
                return Err(SimulationError::ResultValidation(format!(
                    "Job {} was dropped",
                    original.label()
                )));
            }
        }
    }

    Ok(())
}

/// 3. Finish, deadline flag, and response time agree with each other
fn validate_job(job: &Job) -> Result<(), SimulationError> {
    let label = job.label();

    if job.remaining() > job.wcet() {
        return Err(SimulationError::ResultValidation(format!(
            "Job {} has more work remaining than its budget",
            label
        )));
    }

    if job.is_finished() != job.finish_tick().is_some() {
        return Err(SimulationError::ResultValidation(format!(
            "Job {} finish tick disagrees with remaining work",
            label
        )));
    }

    let expected_miss = job
        .finish_tick()
        .is_some_and(|finish| finish > job.abs_deadline());
    if job.missed_deadline() != expected_miss {
        return Err(SimulationError::ResultValidation(format!(
            "Job {} deadline flag is {} but should be {}",
            label,
            job.missed_deadline(),
            expected_miss
        )));
    }

    if let Some(response) = job.response_time() {
        if response < job.wcet() {
            return Err(SimulationError::ResultValidation(format!(
                "Job {} responded in {} ticks with a budget of {}",
                label,
                response,
                job.wcet()
            )));
        }
    }

    if let Some(start) = job.start_tick() {
        if start < job.release_tick() {
            return Err(SimulationError::ResultValidation(format!(
                "Job {} started at {} before its release at {}",
                label,
                start,
                job.release_tick()
            )));
        }
    }

    Ok(())
}

/// 4. Ticks spent in a job's RUN segments equal the work it consumed
fn validate_executed_work(result: &SimResult) -> Result<(), SimulationError> {
    for job in &result.jobs {
        let label = job.label();
        let executed: usize = result
            .timeline
            .iter()
            .filter(|s| !s.is_idle() && s.label == label)
            .map(|s| s.duration())
            .sum();
        let consumed = job.wcet() - job.remaining();
        if executed != consumed {
            return Err(SimulationError::ResultValidation(format!(
                "Job {} ran {} ticks but consumed {} units of work",
                label, executed, consumed
            )));
        }
    }
    Ok(())
}
