//! Step-over-safe collision detection.
//!
//! Entities may advance several cells per tick while the actor advances one.
//! Checking only the actor's post-move cell would let an entity and the actor
//! swap places (or let a fast entity jump across the actor) without a hit.
//! The check therefore also matches the actor's pre-move cell whenever the
//! actor moved sideways this tick.
//!
//! Callers evaluate [`collides`] once per cell an entity enters, not once per
//! tick, so a multi-cell move can register a hit mid-path even if its final
//! cell does not overlap the actor.
//!
//! # Resolution order
//!
//! The engine visits slots in their fixed order and the first slot that
//! produces a [`ContactOutcome`] halts entity movement for the tick. When a
//! collectible and a lethal entity could both reach the actor in the same
//! tick, slot order alone decides which one counts.

use serde::{Deserialize, Serialize};

use tessera::{Cell, GridSize};

use crate::entity::{Capabilities, Direction};

/// Whether an entity at `entity` hits an actor now at `actor` that was at
/// `actor_old` before this tick's move.
#[must_use]
pub fn collides(entity: Cell, actor: Cell, actor_old: Cell, moving_laterally: bool) -> bool {
    entity == actor || (moving_laterally && entity == actor_old)
}

/// What a contact with the actor means for an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// The actor picked the entity up
    Collected,
    /// The entity (or its shot) killed the actor
    Lethal,
    /// A player projectile destroyed the entity
    Destroyed,
}

/// Outcome of the actor touching an entity with `caps`, if any.
///
/// Collectibles take precedence over lethality; a kind with neither
/// capability passes through the actor.
#[must_use]
pub fn contact_outcome(caps: Capabilities) -> Option<ContactOutcome> {
    if caps.contains(Capabilities::COLLECTIBLE) {
        Some(ContactOutcome::Collected)
    } else if caps.contains(Capabilities::BLOCKS_PLAYER) {
        Some(ContactOutcome::Lethal)
    } else {
        None
    }
}

/// The player-controlled actor.
///
/// `previous` is the head cell before this tick's move; it exists only for
/// step-over detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Head cell after this tick's move
    pub cell: Cell,
    /// Head cell before this tick's move
    pub previous: Cell,
    /// Facing; the tail (if any) trails behind it
    pub facing: Direction,
    /// Body length in cells (1 or 2)
    pub length: usize,
}

impl Actor {
    /// A stationary actor.
    #[must_use]
    pub fn new(cell: Cell, facing: Direction, length: usize) -> Self {
        Self {
            cell,
            previous: cell,
            facing,
            length,
        }
    }

    /// The tail cell of a two-cell actor.
    #[must_use]
    pub fn tail(&self) -> Option<Cell> {
        if self.length < 2 {
            return None;
        }
        self.cell.shifted(-self.facing.step())
    }

    /// Cells currently covered by the actor, head first.
    #[must_use]
    pub fn body(&self) -> Vec<Cell> {
        std::iter::once(self.cell).chain(self.tail()).collect()
    }

    /// Whether an entity entering `cell` hits the actor.
    ///
    /// Only the head is checked against the pre-move cell; the tail of a
    /// turning actor occupies its old head cell anyway.
    #[must_use]
    pub fn is_hit(&self, cell: Cell, moving_laterally: bool) -> bool {
        collides(cell, self.cell, self.previous, moving_laterally) || self.tail() == Some(cell)
    }

    /// Record the pre-move cell at the start of a tick.
    pub fn begin_tick(&mut self) {
        self.previous = self.cell;
    }

    /// Move one column in `direction`, turning to face it.
    ///
    /// The head stops at the board edge; a two-cell actor keeps its tail on
    /// the board because it turns before moving.
    pub fn move_lateral(&mut self, direction: Direction, grid: GridSize) {
        self.facing = direction;
        if let Some(col) = direction.advance(self.cell.col, 1, grid) {
            self.cell.col = col;
        }
        debug_assert!(
            self.tail().map_or(true, |t| grid.contains(t)),
            "actor tail left the board"
        );
    }

    /// Move one row, clamped to `top..=bottom`.
    pub fn move_vertical(&mut self, up: bool, top: usize, bottom: usize) {
        self.cell.row = if up {
            self.cell.row.saturating_sub(1).max(top)
        } else {
            (self.cell.row + 1).min(bottom)
        };
    }
}
