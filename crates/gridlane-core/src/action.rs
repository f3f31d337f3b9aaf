//! Player actions.
//!
//! Callers drive the engine with small integer action ids. The id space is
//! shared by every game; each [`Ruleset`](crate::rules::Ruleset) declares the
//! subset it accepts through an [`ActionSet`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StepError;

/// A single player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Stand still
    Noop = 0,
    /// Move one column left
    Left = 1,
    /// Move one column right
    Right = 2,
    /// Move one row up
    Up = 3,
    /// Move one row down
    Down = 4,
    /// Fire a projectile in the facing direction
    Shoot = 5,
}

impl Action {
    /// Number of actions in the id space.
    pub const COUNT: usize = 6;

    /// All actions in id order.
    #[must_use]
    pub const fn all() -> &'static [Action] {
        &[
            Action::Noop,
            Action::Left,
            Action::Right,
            Action::Up,
            Action::Down,
            Action::Shoot,
        ]
    }

    /// The action's id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Whether this action moves the actor sideways.
    ///
    /// Lateral moves are the ones that can carry the actor across an entity
    /// within a tick, so collision checks also consider the pre-move cell.
    #[must_use]
    pub const fn is_lateral(self) -> bool {
        matches!(self, Action::Left | Action::Right)
    }

    /// The [`ActionSet`] flag for this action.
    #[must_use]
    pub const fn flag(self) -> ActionSet {
        match self {
            Action::Noop => ActionSet::NOOP,
            Action::Left => ActionSet::LEFT,
            Action::Right => ActionSet::RIGHT,
            Action::Up => ActionSet::UP,
            Action::Down => ActionSet::DOWN,
            Action::Shoot => ActionSet::SHOOT,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = StepError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Action::all()
            .get(usize::from(id))
            .copied()
            .ok_or(StepError::UnknownAction(id))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Noop => "nop",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Shoot => "shoot",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// The set of actions a game accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ActionSet: u8 {
        /// Stand still
        const NOOP = 1 << 0;
        /// Move left
        const LEFT = 1 << 1;
        /// Move right
        const RIGHT = 1 << 2;
        /// Move up
        const UP = 1 << 3;
        /// Move down
        const DOWN = 1 << 4;
        /// Shoot
        const SHOOT = 1 << 5;

        /// Stand still or move in any of the four directions.
        const MOVE = Self::NOOP.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::UP.bits()
            | Self::DOWN.bits();
    }
}

impl ActionSet {
    /// Whether the set accepts `action`.
    #[must_use]
    pub const fn allows(self, action: Action) -> bool {
        self.contains(action.flag())
    }

    /// Accepted actions in id order.
    pub fn actions(self) -> impl Iterator<Item = Action> {
        Action::all().iter().copied().filter(move |a| self.allows(*a))
    }
}
