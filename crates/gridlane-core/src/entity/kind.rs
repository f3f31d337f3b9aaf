//! Entity kinds and their capabilities.
//!
//! A kind is pure data: a name, the observation channel it is drawn on, its
//! default spawn weight and a [`Capabilities`] set. The engine decides what
//! happens on contact by looking only at the capabilities, so new game
//! variants are described rather than coded.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use tessera::ChannelId;

bitflags! {
    /// What an entity kind can do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Touching the actor ends the episode
        const BLOCKS_PLAYER = 1 << 0;
        /// Touching the actor consumes the entity
        const COLLECTIBLE = 1 << 1;
        /// Fires its own shot along its lane
        const SHOOTS = 1 << 2;
        /// Drawn without a trail
        const IS_PROJECTILE = 1 << 3;
        /// Destroyed by player projectiles
        const SHOOTABLE = 1 << 4;
    }
}

/// Index of a kind within its ruleset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KindId(u8);

impl KindId {
    /// Creates a kind id from its ruleset index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// The ruleset index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}", self.0)
    }
}

/// Description of one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityKind {
    /// Name used in configs and diagnostics
    pub name: String,
    /// Observation channel
    pub channel: ChannelId,
    /// Default spawn probability
    pub weight: f64,
    /// Contact and shooting behavior
    pub capabilities: Capabilities,
}

impl EntityKind {
    /// Creates a kind.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        channel: ChannelId,
        weight: f64,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            weight,
            capabilities,
        }
    }

    /// Whether this kind has every capability in `caps`.
    #[must_use]
    pub fn can(&self, caps: Capabilities) -> bool {
        self.capabilities.contains(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_combine() {
        let sub = EntityKind::new(
            "submarine",
            2,
            0.15,
            Capabilities::BLOCKS_PLAYER | Capabilities::SHOOTS | Capabilities::SHOOTABLE,
        );
        assert!(sub.can(Capabilities::SHOOTS));
        assert!(sub.can(Capabilities::BLOCKS_PLAYER | Capabilities::SHOOTABLE));
        assert!(!sub.can(Capabilities::COLLECTIBLE));
    }

    #[test]
    fn kind_id_index() {
        assert_eq!(KindId::new(3).index(), 3);
        assert_eq!(KindId::new(3).to_string(), "kind#3");
    }
}
