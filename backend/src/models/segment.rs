//! Timeline segments
//!
//! A segment is a maximal contiguous tick range `[start, end)` during which
//! the processor stayed in one state: running one job, or idle. The segments
//! of a completed run partition `[0, horizon)` in time order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used for idle segments
pub const IDLE_LABEL: &str = "IDLE";

/// Processor state during a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    Run,
    Idle,
}

impl CpuState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpuState::Run => "RUN",
            CpuState::Idle => "IDLE",
        }
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contiguous run of one processor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// First tick (inclusive)
    pub start: usize,
    /// Last tick (exclusive)
    pub end: usize,
    pub state: CpuState,
    /// Job label while running, `IDLE` otherwise
    pub label: String,
}

impl Segment {
    /// Segment during which `label` occupied the processor
    pub fn run(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            state: CpuState::Run,
            label: label.into(),
        }
    }

    /// Segment during which no job was eligible
    pub fn idle(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            state: CpuState::Idle,
            label: IDLE_LABEL.to_string(),
        }
    }

    pub fn duration(&self) -> usize {
        self.end - self.start
    }

    pub fn is_idle(&self) -> bool {
        self.state == CpuState::Idle
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{}) {}", self.state, self.start, self.end, self.label)
    }
}
