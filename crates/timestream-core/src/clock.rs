//! Simulation clock: tick counter and simulation time.
//!
//! Simulation time is measured in seconds from the origin and is what the
//! activity model and event timeline see. Tick 1 runs at the origin; each
//! later tick is one tick interval further on.

use std::time::Duration;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter with the matching simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Last tick started (0 before the first tick).
    tick: u64,
    /// Simulation time of the current tick, in seconds.
    sim_time: f64,
    /// Seconds of simulation time per tick.
    step_secs: f64,
}

impl SimulationClock {
    /// A clock starting at `origin` that advances one tick interval per tick.
    pub fn new(origin: f64, tick_interval: Duration) -> Self {
        Self {
            tick: 0,
            sim_time: origin,
            step_secs: tick_interval.as_secs_f64(),
        }
    }

    /// Start the next tick and return its number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter is exhausted.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        let next = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        if self.tick > 0 {
            self.sim_time += self.step_secs;
        }
        self.tick = next;
        Ok(next)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulation time of the current tick.
    pub const fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_runs_at_origin() {
        let mut clock = SimulationClock::new(0.0, Duration::from_millis(1000));
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.advance().ok(), Some(1));
        assert!(clock.sim_time().abs() < f64::EPSILON);
        assert_eq!(clock.advance().ok(), Some(2));
        assert!((clock.sim_time() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fractional_intervals_accumulate() {
        let mut clock = SimulationClock::new(5.0, Duration::from_millis(250));
        for _ in 0..5 {
            assert!(clock.advance().is_ok());
        }
        assert!((clock.sim_time() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = SimulationClock::new(0.0, Duration::from_millis(1));
        clock.tick = u64::MAX;
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
    }
}
