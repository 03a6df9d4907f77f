//! Simulation Engine
//!
//! Main tick loop driving one scheduling policy over a periodic task set.
//!
//! # Architecture
//!
//! ```text
//! Setup:
//!   validate config → generate all jobs over [0, horizon)
//!
//! For each tick t:
//! 1. Log releases at t
//! 2. Query the policy once → job index or idle
//! 3. Validate the selection (in range, eligible)
//! 4. On occupant change: close the open segment, count a preemption if the
//!    previous job is unfinished, open a new segment, reset the quantum
//! 5. Execute one unit of the occupant (first start, completion, deadline)
//! 6. Advance time
//!
//! Finish:
//!   close the last segment at the horizon → SimResult
//! ```
//!
//! The engine owns bookkeeping (segments, remaining work, deadlines,
//! preemptions). Which job runs is decided by the policy alone.
//!
//! # Example
//!
//! ```rust
//! use sched_simulator_core_rs::orchestrator::{generate_and_simulate, SimConfig};
//! use sched_simulator_core_rs::policy::EdfPolicy;
//! use sched_simulator_core_rs::Task;
//!
//! let tasks = vec![Task::new(1, 10, 3, 10)];
//! let config = SimConfig { horizon: 30, rr_quantum: 5 };
//!
//! let result = generate_and_simulate(&tasks, &config, Box::new(EdfPolicy::new())).unwrap();
//! assert_eq!(result.jobs.len(), 3);
//! assert_eq!(result.timeline.len(), 6);
//! assert!(result.jobs.iter().all(|j| !j.missed_deadline()));
//! ```

use crate::arrivals::generate_jobs;
use crate::core::time::TimeManager;
use crate::models::{
    validate_task_set, Completion, Event, EventLog, Job, Segment, SimResult, Task, TaskError,
};
use crate::policy::{
    EdfPolicy, FcfsPolicy, FixedPriorityPolicy, RoundRobinPolicy, SchedulingPolicy,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Per-run simulation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of ticks to simulate, `[0, horizon)`
    pub horizon: usize,

    /// Round-robin quantum in ticks (ignored by other policies)
    #[serde(default = "default_quantum")]
    pub rr_quantum: usize,
}

fn default_quantum() -> usize {
    5
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon: 200,
            rr_quantum: default_quantum(),
        }
    }
}

/// Policy selection for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PolicyConfig {
    /// First-come-first-served
    Fcfs,

    /// Earliest deadline first
    Edf,

    /// Fixed priority: explicit task priorities, else rate-monotonic
    RateMonotonic,

    /// Round-robin; `quantum` overrides `SimConfig::rr_quantum` when set
    RoundRobin {
        #[serde(default)]
        quantum: Option<usize>,
    },
}

impl PolicyConfig {
    /// Every supported policy, in display order
    pub fn all() -> [PolicyConfig; 4] {
        [
            PolicyConfig::Fcfs,
            PolicyConfig::Edf,
            PolicyConfig::RateMonotonic,
            PolicyConfig::RoundRobin { quantum: None },
        ]
    }

    /// Short CLI name
    pub fn name(&self) -> &'static str {
        match self {
            PolicyConfig::Fcfs => "fcfs",
            PolicyConfig::Edf => "edf",
            PolicyConfig::RateMonotonic => "rm",
            PolicyConfig::RoundRobin { .. } => "rr",
        }
    }

    /// Quantum this policy will run with under `config`
    pub fn effective_quantum(&self, config: &SimConfig) -> usize {
        match self {
            PolicyConfig::RoundRobin { quantum: Some(q) } => *q,
            _ => config.rr_quantum,
        }
    }

    /// Build a fresh policy instance for one run
    pub fn build(
        &self,
        tasks: &[Task],
        config: &SimConfig,
    ) -> Result<Box<dyn SchedulingPolicy>, SimulationError> {
        let policy: Box<dyn SchedulingPolicy> = match self {
            PolicyConfig::Fcfs => Box::new(FcfsPolicy::new()),
            PolicyConfig::Edf => Box::new(EdfPolicy::new()),
            PolicyConfig::RateMonotonic => Box::new(FixedPriorityPolicy::new(tasks)),
            PolicyConfig::RoundRobin { .. } => {
                let quantum = self.effective_quantum(config);
                if quantum == 0 {
                    return Err(SimulationError::InvalidConfig(
                        "round-robin quantum must be > 0".to_string(),
                    ));
                }
                Box::new(RoundRobinPolicy::new(quantum))
            }
        };
        Ok(policy)
    }
}

impl fmt::Display for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized policy name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown policy '{0}' (expected one of: fcfs, edf, rm, rr)")]
pub struct PolicyParseError(pub String);

impl FromStr for PolicyConfig {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" => Ok(PolicyConfig::Fcfs),
            "edf" => Ok(PolicyConfig::Edf),
            "rm" | "fp" => Ok(PolicyConfig::RateMonotonic),
            "rr" => Ok(PolicyConfig::RoundRobin { quantum: None }),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

/// Complete description of one run: task set, parameters, policy
///
/// # Example
///
/// ```
/// use sched_simulator_core_rs::orchestrator::{PolicyConfig, ScenarioConfig};
///
/// let scenario = ScenarioConfig::from_json_str(r#"{
///     "sim": { "horizon": 100, "rr_quantum": 4 },
///     "policy": { "type": "RoundRobin" },
///     "tasks": [
///         { "id": 1, "period": 10, "wcet": 3, "deadline": 10 },
///         { "id": 2, "period": 25, "wcet": 8, "deadline": 25, "phase": 5 }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(scenario.policy, PolicyConfig::RoundRobin { quantum: None });
/// assert_eq!(scenario.tasks[1].phase, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub sim: SimConfig,

    #[serde(default = "default_policy")]
    pub policy: PolicyConfig,

    pub tasks: Vec<Task>,
}

fn default_policy() -> PolicyConfig {
    PolicyConfig::Edf
}

impl ScenarioConfig {
    /// Parse a scenario from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::Serialization(format!("Scenario parse failed: {}", e))
        })
    }

    /// Load a scenario from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::InvalidConfig(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// SimConfig with the policy's quantum override applied
    pub fn effective_sim_config(&self) -> SimConfig {
        SimConfig {
            horizon: self.sim.horizon,
            rr_quantum: self.policy.effective_quantum(&self.sim),
        }
    }

    /// Build the policy and run the whole scenario
    pub fn run(&self) -> Result<SimResult, SimulationError> {
        let sim = self.effective_sim_config();
        let policy = self.policy.build(&self.tasks, &sim)?;
        generate_and_simulate(&self.tasks, &sim, policy)
    }
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Task set validation error
    #[error("Invalid task set: {0}")]
    InvalidTask(#[from] TaskError),

    /// Policy returned an index outside the job collection
    #[error("Policy '{policy}' returned job index {index} at tick {tick}, but only {len} jobs exist")]
    PolicyIndexOutOfRange {
        policy: &'static str,
        tick: usize,
        index: usize,
        len: usize,
    },

    /// Policy selected a job that is unreleased or already finished
    #[error("Policy '{policy}' selected ineligible job {job} at tick {tick}")]
    IneligibleSelection {
        policy: &'static str,
        tick: usize,
        job: String,
    },

    /// `tick()` called after the last tick was simulated
    #[error("Horizon {horizon} already reached")]
    HorizonReached { horizon: usize },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A completed result violates a simulation invariant
    #[error("Result validation failed: {0}")]
    ResultValidation(String),
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Tick that was simulated
    pub tick: usize,

    /// Job index that occupied the processor, None if idle
    pub occupant: Option<usize>,

    /// Occupant finished during this tick
    pub completed: bool,

    /// Occupant finished after its absolute deadline
    pub deadline_missed: bool,
}

// ============================================================================
// Simulator
// ============================================================================

/// Tick-loop engine for one run of one policy
///
/// The simulator owns the job collection and the policy for the duration of
/// the run; neither may be shared with another run.
///
/// # Determinism
///
/// There is no randomness. Same tasks + same config + fresh policy =
/// identical `SimResult`.
pub struct Simulator {
    /// Job collection, exclusively owned during the run
    jobs: Vec<Job>,

    /// Time management
    time_manager: TimeManager,

    /// Active policy
    policy: Box<dyn SchedulingPolicy>,

    /// Quantum expiry is logged against: the policy's own, else `rr_quantum`
    quantum: usize,

    /// Quantum left for the current occupant
    quantum_left: usize,

    /// Job index occupying the processor (None = idle)
    occupant: Option<usize>,

    /// Start tick of the open segment; None before the first tick
    segment_start: Option<usize>,

    /// Closed segments, in time order
    timeline: Vec<Segment>,

    /// Index of the first job not yet announced as released
    next_release: usize,

    /// Event log (all simulation events)
    event_log: EventLog,
}

impl Simulator {
    /// Create a simulator from a task set, config and policy
    ///
    /// # Returns
    ///
    /// * `Ok(Simulator)` - jobs generated, ready for tick 0
    /// * `Err(SimulationError)` - configuration or task validation failed
    pub fn new(
        tasks: &[Task],
        config: &SimConfig,
        policy: Box<dyn SchedulingPolicy>,
    ) -> Result<Self, SimulationError> {
        let quantum = policy.enforced_quantum().unwrap_or(config.rr_quantum);
        Self::validate_config(tasks, config, policy.as_ref(), quantum)?;

        Ok(Self {
            jobs: generate_jobs(tasks, config.horizon),
            time_manager: TimeManager::new(config.horizon),
            policy,
            quantum,
            quantum_left: quantum,
            occupant: None,
            segment_start: None,
            timeline: Vec::new(),
            next_release: 0,
            event_log: EventLog::new(),
        })
    }

    /// Validate configuration
    fn validate_config(
        tasks: &[Task],
        config: &SimConfig,
        policy: &dyn SchedulingPolicy,
        quantum: usize,
    ) -> Result<(), SimulationError> {
        if config.horizon == 0 {
            return Err(SimulationError::InvalidConfig(
                "horizon must be > 0".to_string(),
            ));
        }

        if policy.uses_quantum() && quantum == 0 {
            return Err(SimulationError::InvalidConfig(
                "round-robin quantum must be > 0".to_string(),
            ));
        }

        validate_task_set(tasks)?;
        check_deadline_range(tasks, config.horizon)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Next tick to be simulated
    pub fn current_tick(&self) -> usize {
        self.time_manager.current_tick()
    }

    pub fn horizon(&self) -> usize {
        self.time_manager.horizon()
    }

    pub fn is_finished(&self) -> bool {
        self.time_manager.is_finished()
    }

    /// Jobs with their statistics so far
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Job index currently occupying the processor
    pub fn occupant(&self) -> Option<usize> {
        self.occupant
    }

    /// Segments closed so far (the open one is not included)
    pub fn timeline(&self) -> &[Segment] {
        &self.timeline
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Get reference to event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        if self.time_manager.is_finished() {
            return Err(SimulationError::HorizonReached {
                horizon: self.time_manager.horizon(),
            });
        }

        let tick = self.time_manager.current_tick();

        // STEP 1: RELEASES
        self.log_releases(tick);

        // STEP 2: POLICY DECISION (exactly once per tick)
        let selected = self.policy.select_next(&self.jobs, tick);
        self.check_selection(selected, tick)?;

        // STEP 3: SEGMENT BOOKKEEPING
        match self.segment_start {
            None => self.open_segment(tick, selected),
            Some(_) if selected != self.occupant => {
                self.close_segment(tick);
                self.record_preemption(tick, selected);
                self.open_segment(tick, selected);
            }
            Some(_) => {}
        }

        // STEP 4: EXECUTE ONE UNIT
        let mut result = TickResult {
            tick,
            occupant: self.occupant,
            completed: false,
            deadline_missed: false,
        };

        match self.occupant {
            Some(idx) => {
                let (completed, missed) = self.execute(idx, tick);
                result.completed = completed;
                result.deadline_missed = missed;
            }
            None => {
                // No decay while idle
                self.quantum_left = self.quantum;
            }
        }

        // STEP 5: ADVANCE TIME
        self.time_manager.advance_tick();

        Ok(result)
    }

    /// Run every remaining tick up to the horizon
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while !self.time_manager.is_finished() {
            self.tick()?;
        }
        Ok(())
    }

    /// Run to the horizon and return the result
    pub fn finish(self) -> Result<SimResult, SimulationError> {
        self.finish_with_log().map(|(result, _)| result)
    }

    /// Run to the horizon and return the result together with the event log
    pub fn finish_with_log(mut self) -> Result<(SimResult, EventLog), SimulationError> {
        self.run()?;
        let horizon = self.time_manager.horizon();
        self.close_segment(horizon);

        let result = SimResult {
            jobs: self.jobs,
            timeline: self.timeline,
        };
        Ok((result, self.event_log))
    }

    // ========================================================================
    // Tick Steps
    // ========================================================================

    fn log_releases(&mut self, tick: usize) {
        while let Some(job) = self.jobs.get(self.next_release) {
            if job.release_tick() > tick {
                break;
            }
            self.event_log.log(Event::JobReleased {
                tick: job.release_tick(),
                job: job.label(),
                abs_deadline: job.abs_deadline(),
            });
            self.next_release += 1;
        }
    }

    /// Reject out-of-range or ineligible selections
    fn check_selection(&self, selected: Option<usize>, tick: usize) -> Result<(), SimulationError> {
        let Some(idx) = selected else {
            return Ok(());
        };

        let job = self
            .jobs
            .get(idx)
            .ok_or(SimulationError::PolicyIndexOutOfRange {
                policy: self.policy.name(),
                tick,
                index: idx,
                len: self.jobs.len(),
            })?;

        if !job.is_eligible(tick) {
            return Err(SimulationError::IneligibleSelection {
                policy: self.policy.name(),
                tick,
                job: job.label(),
            });
        }

        Ok(())
    }

    fn label_of(&self, occupant: Option<usize>) -> Option<String> {
        occupant.map(|idx| self.jobs[idx].label())
    }

    fn open_segment(&mut self, tick: usize, occupant: Option<usize>) {
        self.occupant = occupant;
        self.segment_start = Some(tick);
        self.quantum_left = self.quantum;

        let event = match self.label_of(occupant) {
            Some(job) => Event::Dispatch { tick, job },
            None => Event::Idle { tick },
        };
        self.event_log.log(event);
    }

    fn close_segment(&mut self, end: usize) {
        let Some(start) = self.segment_start.take() else {
            return;
        };

        let segment = match self.label_of(self.occupant) {
            Some(label) => Segment::run(start, end, label),
            None => Segment::idle(start, end),
        };
        self.timeline.push(segment);
    }

    /// Count a preemption against the outgoing occupant if it still has work
    fn record_preemption(&mut self, tick: usize, next: Option<usize>) {
        let Some(prev) = self.occupant else {
            return;
        };
        if self.jobs[prev].is_finished() {
            return;
        }

        self.jobs[prev].record_preemption();
        let event = Event::Preemption {
            tick,
            job: self.jobs[prev].label(),
            next: self.label_of(next),
        };
        self.event_log.log(event);
    }

    /// Run one unit of job `idx`; returns (completed, deadline_missed)
    fn execute(&mut self, idx: usize, tick: usize) -> (bool, bool) {
        let job = &mut self.jobs[idx];
        let first_run = job.start_tick().is_none();
        let completion = job.execute_unit(tick);
        let abs_deadline = job.abs_deadline();
        let label = job.label();

        if first_run {
            self.event_log.log(Event::JobStarted {
                tick,
                job: label.clone(),
            });
        }

        self.quantum_left = self.quantum_left.saturating_sub(1);

        if let Some(Completion {
            finish_tick,
            response_time,
            missed_deadline,
        }) = completion
        {
            self.event_log.log(Event::JobCompleted {
                tick: finish_tick,
                job: label.clone(),
                response_time,
            });
            if missed_deadline {
                self.event_log.log(Event::DeadlineMiss {
                    tick: finish_tick,
                    job: label,
                    abs_deadline,
                });
            }

            // Next occupant starts with a fresh quantum
            self.quantum_left = self.quantum;
            return (true, missed_deadline);
        }

        if self.policy.uses_quantum() && self.quantum_left == 0 {
            self.event_log.log(Event::QuantumExpired {
                tick: tick + 1,
                job: label,
            });
            self.quantum_left = self.quantum;
        }

        (false, false)
    }
}

/// Reject tasks whose absolute deadlines would not fit in `usize`
///
/// Every release happens before `horizon`, so `horizon + deadline` bounds
/// every absolute deadline.
pub(crate) fn check_deadline_range(tasks: &[Task], horizon: usize) -> Result<(), SimulationError> {
    for task in tasks {
        if horizon.checked_add(task.deadline).is_none() {
            return Err(SimulationError::InvalidConfig(format!(
                "Task {}: deadline {} overflows absolute time with horizon {}",
                task.id, task.deadline, horizon
            )));
        }
    }
    Ok(())
}

/// Run one full simulation of `policy` over `tasks`
///
/// The policy must be freshly constructed for this run. Round-robin callers
/// pass a `RoundRobinPolicy` (or a quantum-driven `FnPolicy`) that owns its
/// rotation state.
pub fn generate_and_simulate(
    tasks: &[Task],
    config: &SimConfig,
    policy: Box<dyn SchedulingPolicy>,
) -> Result<SimResult, SimulationError> {
    Simulator::new(tasks, config, policy)?.finish()
}
