//! Engine configuration.
//!
//! An [`EngineConfig`] holds the tunable numbers of a run; the
//! [`Ruleset`](crate::rules::Ruleset) holds the game. A config is only
//! meaningful together with a ruleset, so validation takes both.
//!
//! Configs load from JSON. Unknown fields are rejected so a typo never
//! silently falls back to a default.
//!
//! # Example
//!
//! ```
//! use gridlane_core::config::EngineConfig;
//! use gridlane_core::rules::Ruleset;
//!
//! let config = EngineConfig::from_json(
//!     r#"{"grid": {"rows": 10, "cols": 10}, "base_speed": 0, "speed_range": 2, "spawn_cooldown": 3}"#,
//! )
//! .unwrap();
//! assert_eq!(config.resolved_max_speed(), 7);
//! assert!(config.validate(&Ruleset::asterix()).is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tessera::GridSize;

use crate::action::Action;
use crate::error::ConfigError;
use crate::rules::{Ruleset, ACTOR_CHANNEL};

/// Allowed deviation of the kind probabilities from 1.
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Tunable numbers for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Board dimensions
    pub grid: GridSize,
    /// Initial upper bound of drawn speeds
    pub base_speed: i32,
    /// Drawn speeds lie in `[bound - speed_range, bound]`
    pub speed_range: i32,
    /// Speed ceiling for level-ups; defaults to `cols - 3`
    #[serde(default)]
    pub max_speed: Option<i32>,
    /// Initial respawn cooldown in ticks
    pub spawn_cooldown: u32,
    /// Ticks between player shots
    #[serde(default)]
    pub shoot_cooldown: u32,
    /// Level up every this many ticks
    #[serde(default)]
    pub level_up_interval: Option<u32>,
    /// Spawn probability per kind name; empty uses the ruleset weights
    #[serde(default)]
    pub kind_probabilities: BTreeMap<String, f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Ruleset::asterix().default_config(GridSize::default())
    }
}

impl EngineConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the config to JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The speed ceiling, falling back to `cols - 3`.
    #[must_use]
    pub fn resolved_max_speed(&self) -> i32 {
        self.max_speed.unwrap_or_else(|| cols_i32(self.grid) - 3)
    }

    /// The slowest speed any spawn can draw.
    ///
    /// Saturates for configs that [`validate`](Self::validate) rejects.
    #[must_use]
    pub fn slowest_speed(&self) -> i32 {
        self.base_speed.saturating_sub(self.speed_range)
    }

    /// The slowest speed a board of this width accepts.
    ///
    /// A slow entity waits `|speed|` ticks per cell; past this limit one
    /// crossing takes longer than an episode is worth.
    #[must_use]
    pub fn slowest_speed_limit(&self) -> i32 {
        cols_i32(self.grid).saturating_mul(-SLOW_SPEED_COLUMNS)
    }

    /// Check that this config can run `ruleset`.
    ///
    /// # Errors
    /// Returns the first problem found. Nothing is clamped or corrected.
    pub fn validate(&self, ruleset: &Ruleset) -> Result<(), ConfigError> {
        let GridSize { rows, cols } = self.grid;
        if rows < 3 || cols < 3 {
            return Err(ConfigError::GridTooSmall { rows, cols });
        }

        validate_ruleset(ruleset)?;

        let length = ruleset.actor.length;
        let band = ruleset.actor.band(self.grid);
        let start = ruleset.actor.start_row(self.grid);
        let fits = matches!((band, start), (Some((top, bottom)), Some(row)) if row >= top && row <= bottom);
        if length == 0 || length > cols || !fits {
            let (top, bottom) = band.unwrap_or((0, 0));
            return Err(ConfigError::ActorDoesNotFit {
                length,
                top,
                bottom,
                rows,
            });
        }

        if self.speed_range < 0 {
            return Err(ConfigError::NegativeSpeedRange(self.speed_range));
        }
        let limit = self.slowest_speed_limit();
        match self.base_speed.checked_sub(self.speed_range) {
            Some(slowest) if slowest >= limit => {}
            _ => {
                return Err(ConfigError::SpeedTooSlow {
                    base_speed: self.base_speed,
                    speed_range: self.speed_range,
                    limit,
                })
            }
        }
        let max_speed = self.resolved_max_speed();
        if max_speed < self.base_speed {
            return Err(ConfigError::MaxSpeedBelowBase {
                base_speed: self.base_speed,
                max_speed,
            });
        }
        if max_speed >= cols_i32(self.grid) - 1 {
            return Err(ConfigError::MaxSpeedTooHigh { max_speed, cols });
        }

        if self.level_up_interval == Some(0) {
            return Err(ConfigError::ZeroLevelUpInterval);
        }

        self.kind_weights(ruleset).map(|_| ())
    }

    /// Spawn weights in ruleset kind order.
    ///
    /// Uses `kind_probabilities` when given; kinds it does not name get
    /// weight 0. Otherwise the ruleset's own weights apply.
    ///
    /// # Errors
    /// Fails on unknown kind names, invalid weights or a sum other than 1.
    pub fn kind_weights(&self, ruleset: &Ruleset) -> Result<Vec<f64>, ConfigError> {
        if let Some(name) = self
            .kind_probabilities
            .keys()
            .find(|name| ruleset.kind_id(name).is_none())
        {
            return Err(ConfigError::UnknownKind(name.clone()));
        }

        let weights: Vec<(String, f64)> = ruleset
            .kinds
            .iter()
            .map(|kind| {
                let weight = if self.kind_probabilities.is_empty() {
                    kind.weight
                } else {
                    self.kind_probabilities.get(&kind.name).copied().unwrap_or(0.0)
                };
                (kind.name.clone(), weight)
            })
            .collect();

        for (kind, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    kind: kind.clone(),
                    weight: *weight,
                });
            }
        }
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightsDoNotSum(total));
        }
        Ok(weights.into_iter().map(|(_, w)| w).collect())
    }
}

/// Structural checks on a ruleset that do not depend on the grid.
fn validate_ruleset(ruleset: &Ruleset) -> Result<(), ConfigError> {
    if ruleset.kinds.is_empty() {
        return Err(ConfigError::NoKinds(ruleset.name.clone()));
    }
    if ruleset.slots_per_lane == 0 {
        return Err(ConfigError::NoSlotsPerLane(ruleset.name.clone()));
    }

    let count = ruleset.channels.len();
    let check = |owner: &str, channel: usize| {
        if channel < count {
            Ok(())
        } else {
            Err(ConfigError::ChannelOutOfRange {
                owner: owner.to_string(),
                channel,
                count,
            })
        }
    };
    check("actor", ACTOR_CHANNEL)?;
    for kind in &ruleset.kinds {
        check(&kind.name, kind.channel)?;
    }
    match ruleset.player_projectile {
        Some(projectile) => check("player projectile", projectile.channel)?,
        None if ruleset.actions.allows(Action::Shoot) => {
            return Err(ConfigError::ShootWithoutProjectile(ruleset.name.clone()));
        }
        None => {}
    }
    Ok(())
}

/// Multiple of the board width bounding how slow an entity may be.
const SLOW_SPEED_COLUMNS: i32 = 4;

fn cols_i32(grid: GridSize) -> i32 {
    i32::try_from(grid.cols).unwrap_or(i32::MAX)
}
