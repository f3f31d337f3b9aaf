//! # Gridlane Core
//!
//! Deterministic tick engine for lane-based grid arcade games.
//!
//! Entities travel along horizontal lanes at signed speeds (slow entities
//! wait several ticks per cell), respawn from slots after a cooldown, and
//! collide with a player-controlled actor. Each tick produces a multi-channel
//! [`tessera::BoardState`] observation and a list of contact events.
//!
//! ## Architecture
//!
//! - **Data**: [`rules::Ruleset`] describes a game (kinds, capabilities,
//!   channels, actions); [`config::EngineConfig`] holds its tunable numbers
//! - **Mechanics**: [`speed`], [`spawner`], [`difficulty`], [`collision`] and
//!   [`entity`] each own one rule of the simulation
//! - **Driver**: [`engine::Engine`] runs the tick order; [`batch::EngineBatch`]
//!   runs many engines in parallel
//!
//! ## Usage
//!
//! ```
//! use gridlane_core::{Engine, Ruleset};
//! use tessera::GridSize;
//!
//! let rules = Ruleset::seaquest();
//! let config = rules.default_config(GridSize::new(10, 10));
//! let mut engine = Engine::new(rules, config, 7).unwrap();
//!
//! let outcome = engine.step(5).unwrap(); // shoot
//! assert_eq!(outcome.tick, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export tessera for board access
pub use tessera;

pub mod action;
pub mod arena;
pub mod batch;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod entity;
pub mod error;
pub mod event;
pub mod observation;
pub mod rules;
pub mod spawner;
pub mod speed;

// Re-exports for convenience
pub use action::{Action, ActionSet};
pub use batch::EngineBatch;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{BatchError, ConfigError, StepError};
pub use event::{CollisionEvent, LevelChange, StepOutcome};
pub use rules::Ruleset;

#[cfg(test)]
mod tests;
