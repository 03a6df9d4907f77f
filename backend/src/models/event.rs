//! Event logging for simulation replay and auditing.
//!
//! This module defines the Event enum which captures every significant
//! processor or job transition during a run. Events enable:
//! - Debugging (understand which job ran when, and why it stopped)
//! - Auditing (cross-check the timeline and job statistics)
//! - Analysis (preemption and deadline-miss patterns)
//!
//! # Event Types
//!
//! - **JobReleased**: a job's release tick was reached
//! - **Dispatch** / **Idle**: a new timeline segment opened
//! - **JobStarted**: a job executed its first unit
//! - **Preemption**: the processor switched away from an unfinished job
//! - **QuantumExpired**: a job used its whole round-robin quantum
//! - **JobCompleted** / **DeadlineMiss**: a job finished (late, for the miss)
//!
//! # Example
//!
//! ```rust
//! use sched_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Dispatch { tick: 0, job: "T1J1".to_string() });
//! log.log(Event::JobCompleted { tick: 3, job: "T1J1".to_string(), response_time: 3 });
//!
//! assert_eq!(log.events_for_job("T1J1").len(), 2);
//! assert_eq!(log.events_of_type("JobCompleted").len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// All events include a tick number for temporal ordering.
/// Events are logged in the order they occur within a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Job became eligible for selection
    JobReleased {
        tick: usize,
        job: String,
        abs_deadline: usize,
    },

    /// A segment opened with `job` occupying the processor
    Dispatch { tick: usize, job: String },

    /// A segment opened with the processor idle
    Idle { tick: usize },

    /// Job executed its first unit of work
    JobStarted { tick: usize, job: String },

    /// Processor switched away from an unfinished job
    Preemption {
        tick: usize,
        job: String,
        /// Job taking over, None when the processor goes idle
        next: Option<String>,
    },

    /// Job exhausted its round-robin quantum without finishing
    QuantumExpired { tick: usize, job: String },

    /// Job finished all of its work at `tick` (the finish tick)
    JobCompleted {
        tick: usize,
        job: String,
        response_time: usize,
    },

    /// Job finished after its absolute deadline
    DeadlineMiss {
        tick: usize,
        job: String,
        abs_deadline: usize,
    },
}

impl Event {
    /// Get the tick number when this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::JobReleased { tick, .. } => *tick,
            Event::Dispatch { tick, .. } => *tick,
            Event::Idle { tick } => *tick,
            Event::JobStarted { tick, .. } => *tick,
            Event::Preemption { tick, .. } => *tick,
            Event::QuantumExpired { tick, .. } => *tick,
            Event::JobCompleted { tick, .. } => *tick,
            Event::DeadlineMiss { tick, .. } => *tick,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::JobReleased { .. } => "JobReleased",
            Event::Dispatch { .. } => "Dispatch",
            Event::Idle { .. } => "Idle",
            Event::JobStarted { .. } => "JobStarted",
            Event::Preemption { .. } => "Preemption",
            Event::QuantumExpired { .. } => "QuantumExpired",
            Event::JobCompleted { .. } => "JobCompleted",
            Event::DeadlineMiss { .. } => "DeadlineMiss",
        }
    }

    /// Get the job label if the event relates to a specific job
    pub fn job(&self) -> Option<&str> {
        match self {
            Event::JobReleased { job, .. } => Some(job),
            Event::Dispatch { job, .. } => Some(job),
            Event::JobStarted { job, .. } => Some(job),
            Event::Preemption { job, .. } => Some(job),
            Event::QuantumExpired { job, .. } => Some(job),
            Event::JobCompleted { job, .. } => Some(job),
            Event::DeadlineMiss { job, .. } => Some(job),
            Event::Idle { .. } => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific job label
    pub fn events_for_job(&self, job: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.job() == Some(job))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.log(Event::JobReleased {
            tick: 0,
            job: "T1J1".to_string(),
            abs_deadline: 10,
        });
        log.log(Event::Dispatch {
            tick: 0,
            job: "T1J1".to_string(),
        });
        log.log(Event::JobStarted {
            tick: 0,
            job: "T1J1".to_string(),
        });
        log.log(Event::Preemption {
            tick: 2,
            job: "T1J1".to_string(),
            next: Some("T2J1".to_string()),
        });
        log.log(Event::Idle { tick: 5 });
        log
    }

    #[test]
    fn test_event_type_and_tick() {
        let log = sample_log();
        assert_eq!(log.events()[3].event_type(), "Preemption");
        assert_eq!(log.events()[3].tick(), 2);
        assert_eq!(log.events()[4].job(), None);
    }

    #[test]
    fn test_event_log_queries() {
        let log = sample_log();
        assert_eq!(log.len(), 5);
        assert_eq!(log.events_at_tick(0).len(), 3);
        assert_eq!(log.events_of_type("Idle").len(), 1);
        // The preemption is attributed to the job that lost the processor
        assert_eq!(log.events_for_job("T1J1").len(), 4);
        assert!(log.events_for_job("T2J1").is_empty());
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_string(&Event::Idle { tick: 7 }).unwrap();
        assert_eq!(json, r#"{"type":"Idle","tick":7}"#);
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = sample_log();
        log.clear();
        assert!(log.is_empty());
    }
}
