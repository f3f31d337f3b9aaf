//! Spawn draws for expired slots.
//!
//! When a slot's cooldown runs out the [`Spawner`] draws where the new entity
//! enters, which way it travels, how fast it is and what it is:
//!
//! - edge and direction are coupled: with probability ½ the entity enters at
//!   column 0 moving right, otherwise at the last column moving left
//! - speed is uniform over `[bound - speed_range, bound]`, inclusive, so slow
//!   (negative) speeds are possible
//! - kind is a single categorical draw over the ruleset's kinds
//!
//! All randomness comes from the generator passed in by the caller.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use tessera::GridSize;

use crate::entity::{Direction, KindId};

/// Everything drawn for one spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDraw {
    /// Entry column
    pub col: usize,
    /// Travel direction
    pub direction: Direction,
    /// Signed speed
    pub speed: i32,
    /// Drawn kind
    pub kind: KindId,
}

/// Categorical distribution over entity kinds.
#[derive(Debug, Clone)]
pub struct KindTable {
    index: WeightedIndex<f64>,
}

impl KindTable {
    /// Build the table from per-kind weights in ruleset order.
    ///
    /// Returns `None` if the weights cannot form a distribution (empty, all
    /// zero, negative or not finite). Callers validate weights beforehand and
    /// report a descriptive error.
    #[must_use]
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.len() > usize::from(u8::MAX) + 1 {
            return None;
        }
        WeightedIndex::new(weights).ok().map(|index| Self { index })
    }

    /// Draw a kind.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> KindId {
        let index = self.index.sample(rng);
        // Table size is capped at 256 entries in `new`
        #[allow(clippy::cast_possible_truncation)]
        KindId::new(index as u8)
    }
}

/// Draws new entities for a board.
#[derive(Debug, Clone)]
pub struct Spawner {
    grid: GridSize,
    speed_range: i32,
    kinds: KindTable,
}

impl Spawner {
    /// Creates a spawner.
    #[must_use]
    pub fn new(grid: GridSize, speed_range: i32, kinds: KindTable) -> Self {
        Self {
            grid,
            speed_range,
            kinds,
        }
    }

    /// Draw a speed in `[bound - speed_range, bound]`.
    pub fn draw_speed<R: Rng + ?Sized>(&self, rng: &mut R, bound: i32) -> i32 {
        rng.gen_range(bound - self.speed_range..=bound)
    }

    /// Draw an entity entering at one of the two board edges.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, bound: i32) -> SpawnDraw {
        let speed = self.draw_speed(rng, bound);
        let (col, direction) = if rng.gen_bool(0.5) {
            (0, Direction::Right)
        } else {
            (self.grid.last_col(), Direction::Left)
        };
        let kind = self.kinds.sample(rng);
        trace!(col, %direction, speed, %kind, "edge spawn");
        SpawnDraw {
            col,
            direction,
            speed,
            kind,
        }
    }

    /// Draw an entity anywhere in its lane, used to pre-populate a board.
    pub fn draw_anywhere<R: Rng + ?Sized>(&self, rng: &mut R, bound: i32) -> SpawnDraw {
        let col = rng.gen_range(0..self.grid.cols);
        let speed = self.draw_speed(rng, bound);
        let direction = if rng.gen_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        };
        let kind = self.kinds.sample(rng);
        SpawnDraw {
            col,
            direction,
            speed,
            kind,
        }
    }
}
