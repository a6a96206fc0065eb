//! Simulation clock.
//!
//! Converts host timestamps into a bounded frame delta split into equal
//! substeps. The first tick only records the time; long stalls (a
//! backgrounded tab, a debugger pause) are clamped to `max_dt` so the world
//! never takes one enormous step.

use crate::config::ClockConfig;
use crate::numeric::{elapsed_seconds, substeps_f32};

/// Work for one rendering tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    /// Length of each substep in seconds.
    pub sub_dt: f32,
    /// Number of substeps to run.
    pub substeps: u32,
}

impl TickPlan {
    /// Total simulated time covered by the plan.
    #[must_use]
    pub fn frame_dt(&self) -> f32 {
        self.sub_dt * substeps_f32(self.substeps)
    }
}

/// Tracks the previous tick's host time.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    last: Option<f64>,
    max_dt: f32,
    substeps: u32,
}

impl SimulationClock {
    /// Clock using the configured clamp and substep count.
    #[must_use]
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            last: None,
            max_dt: config.max_dt,
            substeps: config.substeps.max(1),
        }
    }

    /// Host time of the last tick, if any.
    #[must_use]
    pub const fn last(&self) -> Option<f64> {
        self.last
    }

    /// Advances to host time `now`.
    ///
    /// Returns `None` on the first tick and whenever time did not move
    /// forward.
    ///
    /// # Examples
    /// ```
    /// use palmtide::clock::SimulationClock;
    /// use palmtide::config::ClockConfig;
    /// let mut clock = SimulationClock::new(&ClockConfig::default());
    /// assert!(clock.advance(0.0).is_none());
    /// let plan = clock.advance(10.0).expect("time moved");
    /// assert!(plan.frame_dt() <= 1.0 / 30.0 + 1e-6);
    /// ```
    pub fn advance(&mut self, now: f64) -> Option<TickPlan> {
        let previous = self.last.replace(now)?;
        let dt = elapsed_seconds(previous, now)?.min(self.max_dt);
        if dt <= 0.0 {
            return None;
        }
        Some(TickPlan {
            sub_dt: dt / substeps_f32(self.substeps),
            substeps: self.substeps,
        })
    }

    /// Forgets the previous tick so the next one only records time.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> SimulationClock {
        SimulationClock::new(&ClockConfig::default())
    }

    #[rstest]
    fn first_tick_only_records(mut clock: SimulationClock) {
        assert!(clock.advance(5.0).is_none());
        assert_eq!(clock.last(), Some(5.0));
    }

    #[rstest]
    fn normal_frame_is_split_into_substeps(mut clock: SimulationClock) {
        clock.advance(0.0);
        let plan = clock.advance(1.0 / 60.0).expect("time moved");
        assert_eq!(plan.substeps, 4);
        assert_relative_eq!(plan.sub_dt, 1.0 / 240.0, epsilon = 1e-6);
    }

    #[rstest]
    fn stalls_are_clamped(mut clock: SimulationClock) {
        clock.advance(0.0);
        let plan = clock.advance(3.0).expect("time moved");
        assert_relative_eq!(plan.frame_dt(), 1.0 / 30.0, epsilon = 1e-6);
    }

    #[rstest]
    fn backwards_time_is_skipped(mut clock: SimulationClock) {
        clock.advance(2.0);
        assert!(clock.advance(1.0).is_none());
        assert!(clock.advance(1.0 + 1.0 / 60.0).is_some());
    }
}
