//! Many independent engines stepped in parallel.
//!
//! Engines share nothing, so a batch step fans out across rayon's pool. Every
//! action is validated before any engine advances; a single bad action
//! rejects the whole batch step and leaves all engines untouched.
//!
//! Engine `i` is seeded with `base_seed + i` (wrapping).

use rayon::prelude::*;

use tessera::BoardState;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{BatchError, ConfigError};
use crate::event::StepOutcome;
use crate::rules::Ruleset;

/// A fixed set of engines running the same game.
#[derive(Debug, Clone)]
pub struct EngineBatch {
    engines: Vec<Engine>,
}

impl EngineBatch {
    /// Create `count` engines.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` cannot run `ruleset`.
    pub fn new(
        ruleset: &Ruleset,
        config: &EngineConfig,
        count: usize,
        base_seed: u64,
    ) -> Result<Self, ConfigError> {
        let engines = (0..count)
            .map(|i| Engine::new(ruleset.clone(), config.clone(), env_seed(base_seed, i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { engines })
    }

    /// Number of engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether the batch has no engines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// The engines, in index order.
    #[must_use]
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// Reset every engine; engine `i` gets `base_seed + i`.
    pub fn reset(&mut self, base_seed: u64) -> Vec<BoardState> {
        self.engines
            .par_iter_mut()
            .enumerate()
            .map(|(i, engine)| engine.reset(env_seed(base_seed, i)))
            .collect()
    }

    /// Step every engine with its own action.
    ///
    /// # Errors
    /// Returns [`BatchError::LengthMismatch`] if `actions` does not hold one
    /// action per engine, or [`BatchError::Step`] for the first invalid action.
    /// No engine is advanced in either case.
    pub fn step(&mut self, actions: &[u8]) -> Result<Vec<StepOutcome>, BatchError> {
        if actions.len() != self.engines.len() {
            return Err(BatchError::LengthMismatch {
                expected: self.engines.len(),
                actual: actions.len(),
            });
        }
        for (index, (engine, &action)) in self.engines.iter().zip(actions).enumerate() {
            engine
                .parse_action(action)
                .map_err(|source| BatchError::Step { index, source })?;
        }

        self.engines
            .par_iter_mut()
            .zip(actions.par_iter())
            .enumerate()
            .map(|(index, (engine, &action))| {
                engine
                    .step(action)
                    .map_err(|source| BatchError::Step { index, source })
            })
            .collect()
    }
}

fn env_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}
