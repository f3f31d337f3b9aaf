//! Difficulty ramp.
//!
//! A monotone ratchet over two global bounds that only affect future spawns:
//!
//! - **level up**: `speed_bound = min(speed_bound + 1, max_speed)` and
//!   `cooldown = max(cooldown - 1, 0)`
//! - **level reset**: both return to their initial values
//!
//! Entities already on the board keep the speed they were drawn with.
//!
//! The ramp also owns the optional elapsed-tick trigger: when an interval is
//! configured, [`DifficultyRamp::on_tick`] levels up every `interval` ticks.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Global speed and cooldown bounds for new spawns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifficultyRamp {
    initial_speed: i32,
    initial_cooldown: u32,
    max_speed: i32,
    interval: Option<u32>,
    speed_bound: i32,
    cooldown: u32,
    level: u32,
    timer: u32,
}

impl DifficultyRamp {
    /// Creates a ramp at its initial level.
    #[must_use]
    pub fn new(initial_speed: i32, initial_cooldown: u32, max_speed: i32, interval: Option<u32>) -> Self {
        Self {
            initial_speed,
            initial_cooldown,
            max_speed,
            interval,
            speed_bound: initial_speed,
            cooldown: initial_cooldown,
            level: 0,
            timer: 0,
        }
    }

    /// Upper speed bound for new spawns.
    #[must_use]
    pub fn speed_bound(&self) -> i32 {
        self.speed_bound
    }

    /// Cooldown given to despawned slots.
    #[must_use]
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Number of level-ups since the last reset.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Speed ceiling.
    #[must_use]
    pub fn max_speed(&self) -> i32 {
        self.max_speed
    }

    /// Raise the bounds by one level.
    pub fn level_up(&mut self) {
        self.timer = 0;
        self.level += 1;
        self.speed_bound = (self.speed_bound + 1).min(self.max_speed);
        self.cooldown = self.cooldown.saturating_sub(1);
        debug!(
            level = self.level,
            speed_bound = self.speed_bound,
            cooldown = self.cooldown,
            "level up"
        );
    }

    /// Restore the initial bounds.
    pub fn level_reset(&mut self) {
        self.timer = 0;
        self.level = 0;
        self.speed_bound = self.initial_speed;
        self.cooldown = self.initial_cooldown;
        debug!(
            speed_bound = self.speed_bound,
            cooldown = self.cooldown,
            "level reset"
        );
    }

    /// Count one tick toward the elapsed-tick trigger.
    ///
    /// Returns `true` if this tick caused a level-up.
    pub fn on_tick(&mut self) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        self.timer += 1;
        if self.timer >= interval {
            self.level_up();
            return true;
        }
        false
    }
}
