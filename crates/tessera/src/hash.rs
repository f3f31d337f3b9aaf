//! Board hashing for determinism verification.
//!
//! Two simulations driven by the same seed and action sequence must produce
//! boards with identical hashes on every tick.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::BoardState;

/// Compute a deterministic hash of a board.
///
/// This hash includes:
/// - Grid dimensions
/// - Channel names and ranges
/// - Every cell value, bit for bit
#[must_use]
pub fn hash_board(board: &BoardState) -> u64 {
    let mut hasher = DefaultHasher::new();

    board.size().hash(&mut hasher);

    for channel in board.channels() {
        channel.name.hash(&mut hasher);
        channel.range.0.to_bits().hash(&mut hasher);
        channel.range.1.to_bits().hash(&mut hasher);
    }

    // Hash values as bits to avoid float comparison issues (-0.0 vs 0.0)
    for value in board.as_slice() {
        value.to_bits().hash(&mut hasher);
    }

    hasher.finish()
}
