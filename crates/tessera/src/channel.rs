//! Channel definitions.
//!
//! A channel is one layer of the board. Each channel has a name used in
//! diagnostics and a valid range for its cells.

use serde::{Deserialize, Serialize};

/// Index of a channel within a [`BoardState`](crate::BoardState).
pub type ChannelId = usize;

/// Description of a single observation channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Human-readable channel name
    pub name: String,
    /// Valid range (min, max)
    pub range: (f32, f32),
}

impl ChannelSpec {
    /// Create a channel with an explicit range.
    #[must_use]
    pub fn new(name: impl Into<String>, range: (f32, f32)) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// A presence channel with cells in `[0, 1]`.
    #[must_use]
    pub fn unit(name: impl Into<String>) -> Self {
        Self::new(name, (0.0, 1.0))
    }

    /// A directional channel with cells in `[-1, 1]`.
    ///
    /// Sign is direction of travel, magnitude is progress toward the next move.
    #[must_use]
    pub fn signed(name: impl Into<String>) -> Self {
        Self::new(name, (-1.0, 1.0))
    }

    /// Check whether a value is inside the valid range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.range.0 && value <= self.range.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ranges() {
        let unit = ChannelSpec::unit("player");
        assert!(unit.contains(1.0));
        assert!(!unit.contains(-0.5));

        let signed = ChannelSpec::signed("enemy");
        assert!(signed.contains(-1.0));
        assert!(signed.contains(0.25));
        assert!(!signed.contains(1.5));
    }
}
