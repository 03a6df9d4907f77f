//! Time management for the simulation
//!
//! The simulated processor advances in discrete 1-unit ticks over a fixed
//! horizon `[0, horizon)`. This module provides deterministic time advancement.

use serde::{Deserialize, Serialize};

/// Manages simulation time in discrete ticks up to a fixed horizon
///
/// # Example
/// ```
/// use sched_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new(30); // simulate ticks 0..30
/// assert_eq!(time.current_tick(), 0);
/// assert!(!time.is_finished());
///
/// time.advance_tick();
/// assert_eq!(time.current_tick(), 1);
/// assert_eq!(time.remaining_ticks(), 29);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeManager {
    /// Ticks elapsed since simulation start
    current_tick: usize,
    /// Exclusive end of the simulated range
    horizon: usize,
}

impl TimeManager {
    /// Create a new TimeManager
    ///
    /// # Arguments
    /// * `horizon` - Number of ticks to simulate
    ///
    /// # Panics
    /// Panics if `horizon` is zero. Callers validate configuration first.
    pub fn new(horizon: usize) -> Self {
        assert!(horizon > 0, "horizon must be positive");
        Self {
            current_tick: 0,
            horizon,
        }
    }

    /// Advance time by one tick
    ///
    /// Advancing past the horizon is a no-op.
    pub fn advance_tick(&mut self) {
        if self.current_tick < self.horizon {
            self.current_tick += 1;
        }
    }

    /// Get the current tick (the next tick to be simulated)
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Get the simulation horizon
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Ticks left before the horizon is reached
    pub fn remaining_ticks(&self) -> usize {
        self.horizon - self.current_tick
    }

    /// True once every tick in `[0, horizon)` has been simulated
    ///
    /// # Example
    /// ```
    /// use sched_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(2);
    /// time.advance_tick();
    /// time.advance_tick();
    /// assert!(time.is_finished());
    /// ```
    pub fn is_finished(&self) -> bool {
        self.current_tick >= self.horizon
    }

    /// Check if the current tick is the last one before the horizon
    pub fn is_last_tick(&self) -> bool {
        self.current_tick + 1 == self.horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "horizon must be positive")]
    fn test_zero_horizon_panics() {
        TimeManager::new(0);
    }

    #[test]
    fn test_advance_saturates_at_horizon() {
        let mut time = TimeManager::new(1);
        assert!(time.is_last_tick());
        time.advance_tick();
        time.advance_tick();
        assert_eq!(time.current_tick(), 1);
        assert_eq!(time.remaining_ticks(), 0);
    }
}
