//! What a step reports back.
//!
//! Every call to [`Engine::step`](crate::engine::Engine::step) returns a
//! [`StepOutcome`]: the new observation, the contacts that happened during the
//! tick in the order they were resolved, and any difficulty change.
//!
//! Events carry enough to score a tick (collected and destroyed entities) but
//! the engine itself keeps no score.

use serde::{Deserialize, Serialize};

use tessera::{BoardState, Cell};

use crate::collision::ContactOutcome;
use crate::entity::KindId;

/// A resolved contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Slot index of the entity involved
    pub slot: usize,
    /// Kind of that entity
    pub kind: KindId,
    /// Cell where the contact happened
    pub cell: Cell,
    /// What the contact meant
    pub outcome: ContactOutcome,
    /// Whether a projectile made the contact rather than an entity body
    pub by_shot: bool,
}

/// A change of difficulty level during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelChange {
    /// Bounds were raised; `level` is the new level
    Up {
        /// Level after the change
        level: u32,
    },
    /// Bounds returned to their initial values
    Reset,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Observation after the tick
    pub board: BoardState,
    /// Contacts in resolution order
    pub events: Vec<CollisionEvent>,
    /// The actor was killed; the board has been refilled
    pub terminated: bool,
    /// Difficulty change, if any
    pub level: Option<LevelChange>,
    /// Tick number after this step
    pub tick: u64,
}

impl StepOutcome {
    /// Number of events with `outcome`.
    #[must_use]
    pub fn count(&self, outcome: ContactOutcome) -> usize {
        self.events.iter().filter(|e| e.outcome == outcome).count()
    }

    /// The lethal contact, if the actor died this tick.
    #[must_use]
    pub fn lethal(&self) -> Option<&CollisionEvent> {
        self.events
            .iter()
            .find(|e| e.outcome == ContactOutcome::Lethal)
    }
}
