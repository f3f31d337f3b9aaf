//! Variable-speed motion model.
//!
//! Entity speed is a signed integer:
//!
//! - `speed > 0`: the entity advances `speed` cells every tick.
//! - `speed == 0`: the entity advances one cell every tick.
//! - `speed < 0`: the entity is slow. Its timer counts down from 0 and it
//!   waits `|speed|` ticks, then advances exactly one cell on the following
//!   tick (the "fire" tick), after which the timer restarts at 0.
//!
//! The [`SpeedModel`] additionally holds a precomputed progress table used to
//! show how close a slow entity is to its next move. The table feeds
//! observations only; it never takes part in movement decisions.

use serde::{Deserialize, Serialize};

/// Motion rules plus the progress table for observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedModel {
    /// Progress values, indexed by `timer - speed`.
    ///
    /// Index 0 is 1.0 (moves this tick); the last entry is the smallest
    /// progress a freshly reset slow entity can have.
    bins: Vec<f32>,
}

impl SpeedModel {
    /// Build the model for entities no slower than `slowest_speed`.
    ///
    /// The table always holds at least one entry, so lookups for entities at
    /// speed 0 or above are valid even when no slow speed can be drawn.
    #[must_use]
    pub fn new(slowest_speed: i32) -> Self {
        let len = 1 + slowest_speed.min(0).unsigned_abs() as usize;
        #[allow(clippy::cast_precision_loss)]
        let bins = (0..len).map(|i| (len - i) as f32 / len as f32).collect();
        Self { bins }
    }

    /// Cells to advance on a moving tick.
    ///
    /// Fast entities advance `speed` cells; speed 0 and the fire tick of a
    /// slow entity advance one.
    #[must_use]
    pub fn advance_steps(speed: i32) -> u32 {
        speed.max(1).unsigned_abs()
    }

    /// Whether a slow entity is still waiting for its fire tick.
    #[must_use]
    pub fn is_delaying(speed: i32, timer: i32) -> bool {
        speed < 0 && timer > speed
    }

    /// The timer value after one waiting tick.
    #[must_use]
    pub fn tick_timer(timer: i32) -> i32 {
        timer - 1
    }

    /// Progress toward the next move, in `(0, 1]`.
    ///
    /// Entities at speed 0 or above always read 1.0.
    ///
    /// # Panics
    /// Panics if the model was built for a slower floor than `speed`'s timer
    /// can reach, which means the engine drew a speed below its own bound.
    #[must_use]
    pub fn fraction(&self, timer: i32, speed: i32) -> f32 {
        let index = (timer - speed).max(0).unsigned_abs() as usize;
        assert!(
            index < self.bins.len(),
            "speed {speed} with timer {timer} is slower than the model floor"
        );
        self.bins[index]
    }

    /// The progress table.
    #[must_use]
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn table_for_slow_floor() {
        let model = SpeedModel::new(-2);
        assert_eq!(model.bins().len(), 3);
        assert!((model.bins()[0] - 1.0).abs() < f32::EPSILON);
        assert!((model.bins()[1] - 2.0 / 3.0).abs() < 1e-6);
        assert!((model.bins()[2] - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn table_never_empty() {
        // No slow speed can be drawn; the single entry still covers speed >= 0
        let model = SpeedModel::new(3);
        assert_eq!(model.bins(), &[1.0]);
        assert!((model.fraction(0, 0) - 1.0).abs() < f32::EPSILON);
        assert!((model.fraction(0, 5) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn slow_entity_progress_rises_toward_move() {
        let model = SpeedModel::new(-2);
        let speed = -2;
        let mut timer = 0;
        let mut seen = Vec::new();
        while SpeedModel::is_delaying(speed, timer) {
            seen.push(model.fraction(timer, speed));
            timer = SpeedModel::tick_timer(timer);
        }
        seen.push(model.fraction(timer, speed));
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!((seen[2] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn advance_steps_by_speed() {
        assert_eq!(SpeedModel::advance_steps(3), 3);
        assert_eq!(SpeedModel::advance_steps(1), 1);
        assert_eq!(SpeedModel::advance_steps(0), 1);
        assert_eq!(SpeedModel::advance_steps(-4), 1);
    }

    #[test]
    fn zero_speed_never_delays() {
        assert!(!SpeedModel::is_delaying(0, 0));
    }

    #[test]
    #[should_panic(expected = "slower than the model floor")]
    fn fraction_below_floor_panics() {
        let model = SpeedModel::new(-1);
        let _ = model.fraction(0, -3);
    }

    proptest! {
        #[test]
        fn slow_entities_wait_abs_speed_ticks(speed in -8i32..0) {
            let mut timer = 0;
            let mut waits = 0;
            while SpeedModel::is_delaying(speed, timer) {
                timer = SpeedModel::tick_timer(timer);
                waits += 1;
            }
            prop_assert_eq!(waits, speed.unsigned_abs());
        }

        #[test]
        fn fractions_stay_in_unit_interval(floor in -6i32..4, speed_offset in 0i32..6, wait in 0i32..6) {
            let model = SpeedModel::new(floor);
            let speed = floor + speed_offset;
            let timer = -(wait.min(speed.min(0).abs()));
            let value = model.fraction(timer, speed);
            prop_assert!(value > 0.0 && value <= 1.0);
        }
    }
}
