//! Entity slots and their lifecycle.
//!
//! This module provides the entity types for the lane simulation:
//! - [`Direction`]: Horizontal travel direction
//! - [`Mover`]: State of an entity that is on the board
//! - [`SlotState`]: Either an active mover or a cooldown countdown
//! - [`EntitySlot`]: A fixed lane position that is reused across spawns
//!
//! # Lifecycle
//!
//! ```text
//!   Active(col) --leaves board / consumed--> CoolingDown(cooldown)
//!   CoolingDown(n) --tick, n > 1--> CoolingDown(n - 1)
//!   CoolingDown(1 or 0) --tick--> Active(edge col)   (does not move that tick)
//! ```
//!
//! A slot is never deallocated. Because the state is a tagged variant, a slot
//! cannot hold a column while it is cooling down.
//!
//! # Example
//!
//! ```
//! use gridlane_core::entity::{Direction, EntitySlot, KindId};
//! use gridlane_core::spawner::SpawnDraw;
//!
//! let mut slot = EntitySlot::cooling(1, 2);
//! assert!(slot.try_tick_cooldown());
//! assert!(!slot.try_tick_cooldown());
//!
//! slot.respawn(SpawnDraw {
//!     col: 0,
//!     direction: Direction::Right,
//!     speed: -1,
//!     kind: KindId::new(0),
//! });
//! assert_eq!(slot.col(), Some(0));
//! ```

pub mod kind;

use serde::{Deserialize, Serialize};
use std::fmt;

use tessera::{Cell, GridSize};

use crate::spawner::SpawnDraw;

pub use kind::{Capabilities, EntityKind, KindId};

/// Horizontal travel direction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward column 0
    Left,
    /// Toward the last column
    Right,
}

impl Direction {
    /// Column delta of one step.
    #[must_use]
    pub const fn step(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Observation sign.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Column reached by stepping `cells` from `col`, if it is on the board.
    #[must_use]
    pub fn advance(self, col: usize, cells: usize, grid: GridSize) -> Option<usize> {
        let next = match self {
            Self::Left => col.checked_sub(cells)?,
            Self::Right => col.checked_add(cells)?,
        };
        (next < grid.cols).then_some(next)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// An entity currently on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mover {
    /// Column, always inside the board while active
    pub col: usize,
    /// Signed speed, fixed from spawn until despawn
    pub speed: i32,
    /// Travel direction
    pub direction: Direction,
    /// Kind index into the ruleset
    pub kind: KindId,
    /// Slow-entity wait timer, counting down from 0 toward `speed`
    pub timer: i32,
    /// Column of this entity's live shot, for kinds that shoot
    pub shot: Option<usize>,
}

impl From<SpawnDraw> for Mover {
    fn from(draw: SpawnDraw) -> Self {
        Self {
            col: draw.col,
            speed: draw.speed,
            direction: draw.direction,
            kind: draw.kind,
            timer: 0,
            shot: None,
        }
    }
}

/// State of an [`EntitySlot`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// On the board
    Active(Mover),
    /// Off the board, waiting to respawn
    CoolingDown {
        /// Ticks left before the slot may respawn
        remaining: u32,
    },
}

/// One reusable entity position in a fixed lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySlot {
    row: usize,
    state: SlotState,
}

impl EntitySlot {
    /// A slot in `row` that starts on the board.
    #[must_use]
    pub fn active(row: usize, draw: SpawnDraw) -> Self {
        Self {
            row,
            state: SlotState::Active(draw.into()),
        }
    }

    /// A slot in `row` that starts off the board.
    #[must_use]
    pub fn cooling(row: usize, remaining: u32) -> Self {
        Self {
            row,
            state: SlotState::CoolingDown { remaining },
        }
    }

    /// The lane row; fixed for the slot's lifetime.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    /// Whether the slot is on the board.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SlotState::Active(_))
    }

    /// The mover, if active.
    #[must_use]
    pub fn mover(&self) -> Option<&Mover> {
        match &self.state {
            SlotState::Active(mover) => Some(mover),
            SlotState::CoolingDown { .. } => None,
        }
    }

    /// Mutable access to the mover, if active.
    pub fn mover_mut(&mut self) -> Option<&mut Mover> {
        match &mut self.state {
            SlotState::Active(mover) => Some(mover),
            SlotState::CoolingDown { .. } => None,
        }
    }

    /// Column, if active.
    #[must_use]
    pub fn col(&self) -> Option<usize> {
        self.mover().map(|m| m.col)
    }

    /// Board cell, if active.
    #[must_use]
    pub fn cell(&self) -> Option<Cell> {
        self.col().map(|col| Cell::new(self.row, col))
    }

    /// Ticks left before respawn, if cooling down.
    #[must_use]
    pub fn cooldown(&self) -> Option<u32> {
        match self.state {
            SlotState::CoolingDown { remaining } => Some(remaining),
            SlotState::Active(_) => None,
        }
    }

    /// Take the entity off the board.
    ///
    /// Any live shot of the entity disappears with it.
    ///
    /// # Panics
    /// Panics if the slot is already cooling down.
    pub fn despawn(&mut self, cooldown: u32) {
        assert!(self.is_active(), "despawn of cooling slot in row {}", self.row);
        self.state = SlotState::CoolingDown {
            remaining: cooldown,
        };
    }

    /// Count one cooldown tick. Returns `true` while the slot keeps cooling.
    ///
    /// When this returns `false` the slot must be respawned this tick.
    ///
    /// # Panics
    /// Panics if the slot is active.
    pub fn try_tick_cooldown(&mut self) -> bool {
        match &mut self.state {
            SlotState::CoolingDown { remaining } => {
                *remaining = remaining.saturating_sub(1);
                *remaining > 0
            }
            SlotState::Active(_) => unreachable!("cooldown tick on active slot in row {}", self.row),
        }
    }

    /// Put a new entity on the board.
    ///
    /// # Panics
    /// Panics if the slot is still active.
    pub fn respawn(&mut self, draw: SpawnDraw) {
        assert!(!self.is_active(), "respawn of active slot in row {}", self.row);
        self.state = SlotState::Active(draw.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(col: usize, direction: Direction) -> SpawnDraw {
        SpawnDraw {
            col,
            direction,
            speed: 1,
            kind: KindId::new(0),
        }
    }

    #[test]
    fn direction_advance_stays_on_board() {
        let grid = GridSize::new(5, 5);
        assert_eq!(Direction::Right.advance(3, 1, grid), Some(4));
        assert_eq!(Direction::Right.advance(4, 1, grid), None);
        assert_eq!(Direction::Left.advance(1, 1, grid), Some(0));
        assert_eq!(Direction::Left.advance(0, 1, grid), None);
        assert_eq!(Direction::Left.advance(4, 3, grid), Some(1));
    }

    #[test]
    fn direction_sign_and_reverse() {
        assert_eq!(Direction::Left.step(), -1);
        assert!((Direction::Right.sign() - 1.0).abs() < f32::EPSILON);
        assert_eq!(Direction::Left.reversed(), Direction::Right);
    }

    #[test]
    fn despawn_then_cooldown_then_respawn() {
        let mut slot = EntitySlot::active(2, draw(3, Direction::Left));
        assert_eq!(slot.cell(), Some(Cell::new(2, 3)));

        slot.despawn(3);
        assert_eq!(slot.col(), None);
        assert_eq!(slot.cooldown(), Some(3));

        assert!(slot.try_tick_cooldown());
        assert!(slot.try_tick_cooldown());
        assert!(!slot.try_tick_cooldown());

        slot.respawn(draw(0, Direction::Right));
        assert_eq!(slot.col(), Some(0));
        assert_eq!(slot.cooldown(), None);
        assert_eq!(slot.mover().map(|m| m.timer), Some(0));
    }

    #[test]
    fn zero_cooldown_expires_on_first_tick() {
        let mut slot = EntitySlot::cooling(1, 0);
        assert!(!slot.try_tick_cooldown());
    }

    #[test]
    fn despawn_drops_live_shot() {
        let mut slot = EntitySlot::active(1, draw(2, Direction::Right));
        if let Some(mover) = slot.mover_mut() {
            mover.shot = Some(3);
        }
        slot.despawn(1);
        assert!(!slot.try_tick_cooldown());
        slot.respawn(draw(0, Direction::Right));
        assert_eq!(slot.mover().and_then(|m| m.shot), None);
    }

    #[test]
    #[should_panic(expected = "respawn of active slot")]
    fn respawn_active_slot_panics() {
        let mut slot = EntitySlot::active(1, draw(0, Direction::Right));
        slot.respawn(draw(4, Direction::Left));
    }

    #[test]
    #[should_panic(expected = "despawn of cooling slot")]
    fn despawn_cooling_slot_panics() {
        let mut slot = EntitySlot::cooling(1, 2);
        slot.despawn(2);
    }
}
