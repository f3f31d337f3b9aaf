//! # Tessera
//!
//! Multi-channel grid observations for tick-based arcade simulations.
//!
//! Tessera represents a board as a dense `rows × cols × channels` block of
//! `f32` cells. Every channel declares the range its cells may take, so a
//! consumer can rely on the snapshot without re-validating it. This enables:
//!
//! - **One snapshot format**: the same layout feeds agents, renderers and tests
//! - **Signed progress encoding**: sign carries direction, magnitude carries
//!   sub-cell progress
//! - **Replay checks**: [`hash_board`] gives a bit-exact fingerprint
//!
//! ## Quick Start
//!
//! ```
//! use tessera::{BoardState, Cell, ChannelSpec, GridSize};
//!
//! let mut board = BoardState::new(
//!     GridSize::new(4, 6),
//!     vec![ChannelSpec::unit("player"), ChannelSpec::signed("enemy")],
//! );
//! board.set(Cell::new(3, 2), 0, 1.0);
//! board.set(Cell::new(1, 5), 1, -0.5);
//!
//! assert_eq!(board.get(Cell::new(3, 2), 0), 1.0);
//! assert_eq!(board.nonzero_count(0), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod channel;
pub mod hash;

// Re-exports for convenience
pub use board::BoardState;
pub use channel::{ChannelId, ChannelSpec};
pub use hash::hash_board;

use serde::{Deserialize, Serialize};

/// Board dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl GridSize {
    /// Create a grid size.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if a cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Last column index.
    #[must_use]
    pub const fn last_col(&self) -> usize {
        self.cols.saturating_sub(1)
    }

    /// Last row index.
    #[must_use]
    pub const fn last_row(&self) -> usize {
        self.rows.saturating_sub(1)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index (0 is the top row)
    pub row: usize,
    /// Column index (0 is the leftmost column)
    pub col: usize,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The cell `offset` columns away in the same row, if it is non-negative.
    #[must_use]
    pub fn shifted(self, offset: i32) -> Option<Self> {
        let col = i64::try_from(self.col).ok()? + i64::from(offset);
        usize::try_from(col).ok().map(|col| Self { row: self.row, col })
    }
}
