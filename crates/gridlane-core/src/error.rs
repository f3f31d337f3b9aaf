//! Error types for engine construction and stepping.
//!
//! - [`ConfigError`]: a configuration that cannot host a playable game. These
//!   are detected eagerly when an [`Engine`](crate::engine::Engine) is built
//!   and are never clamped away.
//! - [`StepError`]: an action the current game does not accept. A failed step
//!   leaves the simulation untouched.
//! - [`BatchError`]: a rejected [`EngineBatch`](crate::batch::EngineBatch) step.

use thiserror::Error;

use crate::action::Action;

/// A configuration that cannot be used to build an engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The board cannot host an actor row plus at least one entity lane.
    #[error("grid {rows}x{cols} is too small: at least 3 rows and 3 columns are required")]
    GridTooSmall {
        /// Configured rows
        rows: usize,
        /// Configured columns
        cols: usize,
    },

    /// The speed range is negative.
    #[error("speed_range must be non-negative, got {0}")]
    NegativeSpeedRange(i32),

    /// The slowest drawable speed overflows or would wait longer than the
    /// board allows.
    #[error("base_speed {base_speed} minus speed_range {speed_range} is slower than the limit {limit}")]
    SpeedTooSlow {
        /// Configured base speed
        base_speed: i32,
        /// Configured speed range
        speed_range: i32,
        /// Slowest speed the board accepts
        limit: i32,
    },

    /// The speed ceiling is below the starting speed bound.
    #[error("max_speed {max_speed} is below base_speed {base_speed}")]
    MaxSpeedBelowBase {
        /// Configured base speed
        base_speed: i32,
        /// Configured or derived speed ceiling
        max_speed: i32,
    },

    /// At the speed ceiling an entity would cross the whole board in one tick.
    #[error("max_speed {max_speed} lets an entity cross all {cols} columns in a single tick")]
    MaxSpeedTooHigh {
        /// Configured or derived speed ceiling
        max_speed: i32,
        /// Board columns
        cols: usize,
    },

    /// The ruleset declares no entity kinds.
    #[error("ruleset '{0}' declares no entity kinds")]
    NoKinds(String),

    /// A lane must hold at least one slot.
    #[error("ruleset '{0}' must place at least one slot per lane")]
    NoSlotsPerLane(String),

    /// A probability was given for a kind the ruleset does not declare.
    #[error("unknown entity kind '{0}'")]
    UnknownKind(String),

    /// A spawn weight is negative or not finite.
    #[error("weight for kind '{kind}' must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// Kind name
        kind: String,
        /// Offending weight
        weight: f64,
    },

    /// Spawn weights do not form a probability distribution.
    #[error("kind probabilities sum to {0}, expected 1")]
    WeightsDoNotSum(f64),

    /// An elapsed-tick level-up interval of zero would level up forever.
    #[error("level_up_interval must be positive")]
    ZeroLevelUpInterval,

    /// A kind or projectile writes to a channel the ruleset does not declare.
    #[error("'{owner}' uses channel {channel} but only {count} channels are declared")]
    ChannelOutOfRange {
        /// Kind or projectile name
        owner: String,
        /// Requested channel
        channel: usize,
        /// Declared channel count
        count: usize,
    },

    /// The shoot action is enabled but no player projectile is described.
    #[error("ruleset '{0}' accepts Shoot but defines no player projectile")]
    ShootWithoutProjectile(String),

    /// The actor's body does not fit on the board.
    #[error("actor of length {length} cannot move within rows {top}..={bottom} of a {rows}-row grid")]
    ActorDoesNotFit {
        /// Body length in cells
        length: usize,
        /// Topmost reachable row
        top: usize,
        /// Bottommost reachable row
        bottom: usize,
        /// Board rows
        rows: usize,
    },

    /// The config could not be parsed.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An action that cannot be applied to the current game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// The id does not name any action.
    #[error("unknown action id {0}")]
    UnknownAction(u8),

    /// The action exists but the running game does not accept it.
    #[error("action {action:?} is not available in {game}")]
    ActionNotAllowed {
        /// Rejected action
        action: Action,
        /// Ruleset name
        game: String,
    },
}

/// A rejected batch step. No engine in the batch was advanced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// One action per engine is required.
    #[error("expected {expected} actions, got {actual}")]
    LengthMismatch {
        /// Engines in the batch
        expected: usize,
        /// Actions supplied
        actual: usize,
    },

    /// An individual action was rejected.
    #[error("environment {index}: {source}")]
    Step {
        /// Engine index within the batch
        index: usize,
        /// Underlying step error
        #[source]
        source: StepError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_descriptive() {
        let err = ConfigError::GridTooSmall { rows: 2, cols: 10 };
        assert_eq!(
            err.to_string(),
            "grid 2x10 is too small: at least 3 rows and 3 columns are required"
        );

        let err = ConfigError::MaxSpeedTooHigh {
            max_speed: 9,
            cols: 10,
        };
        assert!(err.to_string().contains("single tick"));
    }

    #[test]
    fn batch_error_wraps_step_error() {
        let err = BatchError::Step {
            index: 3,
            source: StepError::UnknownAction(9),
        };
        assert_eq!(err.to_string(), "environment 3: unknown action id 9");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
