//! The multi-channel board snapshot.
//!
//! Cells are stored row-major with channels innermost, i.e. the flat layout
//! matches a `(rows, cols, channels)` array.

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelId, ChannelSpec};
use crate::{Cell, GridSize};

/// Read-only snapshot of a board, one channel per entity category.
///
/// Writers are expected to respect each channel's declared range; writing
/// outside the grid, to an unknown channel, or out of range is a defect in
/// the writer and panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    size: GridSize,
    channels: Vec<ChannelSpec>,
    cells: Vec<f32>,
}

impl BoardState {
    /// Create an all-zero board.
    #[must_use]
    pub fn new(size: GridSize, channels: Vec<ChannelSpec>) -> Self {
        let cells = vec![0.0; size.area() * channels.len()];
        Self {
            size,
            channels,
            cells,
        }
    }

    /// Board dimensions.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Channel descriptors, indexed by [`ChannelId`].
    #[must_use]
    pub fn channels(&self) -> &[ChannelSpec] {
        &self.channels
    }

    /// Array shape as `(rows, cols, channels)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.size.rows, self.size.cols, self.channels.len())
    }

    fn offset(&self, cell: Cell, channel: ChannelId) -> usize {
        assert!(
            self.size.contains(cell),
            "cell {cell:?} outside {:?}",
            self.size
        );
        assert!(
            channel < self.channels.len(),
            "channel {channel} out of {} channels",
            self.channels.len()
        );
        (cell.row * self.size.cols + cell.col) * self.channels.len() + channel
    }

    /// Read a cell.
    ///
    /// # Panics
    /// Panics if the cell or channel is out of bounds.
    #[must_use]
    pub fn get(&self, cell: Cell, channel: ChannelId) -> f32 {
        self.cells[self.offset(cell, channel)]
    }

    /// Write a cell.
    ///
    /// # Panics
    /// Panics if the cell or channel is out of bounds, or the value is outside
    /// the channel's range.
    pub fn set(&mut self, cell: Cell, channel: ChannelId, value: f32) {
        let offset = self.offset(cell, channel);
        assert!(
            self.channels[channel].contains(value),
            "value {value} outside range of channel '{}'",
            self.channels[channel].name
        );
        self.cells[offset] = value;
    }

    /// Reset every cell to zero, keeping the layout.
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Iterate over one channel in row-major order.
    pub fn channel(&self, channel: ChannelId) -> impl Iterator<Item = f32> + '_ {
        let stride = self.channels.len();
        self.cells.iter().skip(channel).step_by(stride.max(1)).copied()
    }

    /// Number of non-zero cells in a channel.
    #[must_use]
    pub fn nonzero_count(&self, channel: ChannelId) -> usize {
        self.channel(channel).filter(|v| *v != 0.0).count()
    }

    /// Cells of a channel that are non-zero, with their values.
    #[must_use]
    pub fn occupied(&self, channel: ChannelId) -> Vec<(Cell, f32)> {
        let cols = self.size.cols;
        self.channel(channel)
            .enumerate()
            .filter(|(_, v)| *v != 0.0)
            .map(|(i, v)| (Cell::new(i / cols, i % cols), v))
            .collect()
    }

    /// The raw cell buffer in `(rows, cols, channels)` order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board() -> BoardState {
        BoardState::new(
            GridSize::new(3, 4),
            vec![ChannelSpec::unit("player"), ChannelSpec::signed("enemy")],
        )
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = board();
        assert_eq!(board.shape(), (3, 4, 2));
        assert_eq!(board.as_slice().len(), 24);
        assert!(board.as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_set_get_layout() {
        let mut board = board();
        board.set(Cell::new(1, 2), 1, -1.0);
        assert_eq!(board.get(Cell::new(1, 2), 1), -1.0);
        assert_eq!(board.get(Cell::new(1, 2), 0), 0.0);
        // (row * cols + col) * channels + channel
        assert_eq!(board.as_slice()[(4 + 2) * 2 + 1], -1.0);
    }

    #[test]
    fn test_occupied_reports_cells() {
        let mut board = board();
        board.set(Cell::new(0, 3), 1, 0.5);
        board.set(Cell::new(2, 0), 1, -1.0);
        board.set(Cell::new(2, 1), 0, 1.0);

        assert_eq!(board.nonzero_count(1), 2);
        assert_eq!(
            board.occupied(1),
            vec![(Cell::new(0, 3), 0.5), (Cell::new(2, 0), -1.0)]
        );
        assert_eq!(board.occupied(0), vec![(Cell::new(2, 1), 1.0)]);
    }

    #[test]
    fn test_clear() {
        let mut board = board();
        board.set(Cell::new(0, 0), 0, 1.0);
        board.clear();
        assert_eq!(board.nonzero_count(0), 0);
    }

    #[test]
    #[should_panic(expected = "outside range")]
    fn test_set_out_of_range_panics() {
        let mut board = board();
        board.set(Cell::new(0, 0), 0, -1.0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_set_out_of_bounds_panics() {
        let mut board = board();
        board.set(Cell::new(3, 0), 0, 1.0);
    }

    #[test]
    fn test_serde_roundtrip_preserves_layout() {
        let mut board = board();
        board.set(Cell::new(2, 3), 1, 0.25);
        let json = serde_json::to_string(&board).unwrap();
        let back: BoardState = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }

    proptest! {
        #[test]
        fn set_touches_exactly_one_slot(
            rows in 1usize..8,
            cols in 1usize..8,
            row_seed in any::<usize>(),
            col_seed in any::<usize>(),
            channel in 0usize..2,
            value in -1.0f32..=1.0,
        ) {
            prop_assume!(value != 0.0);
            let mut board = BoardState::new(
                GridSize::new(rows, cols),
                vec![ChannelSpec::signed("a"), ChannelSpec::signed("b")],
            );
            let cell = Cell::new(row_seed % rows, col_seed % cols);
            board.set(cell, channel, value);

            prop_assert_eq!(board.get(cell, channel), value);
            prop_assert_eq!(board.as_slice().iter().filter(|v| **v != 0.0).count(), 1);
            prop_assert_eq!(board.occupied(channel), vec![(cell, value)]);
            prop_assert_eq!(board.nonzero_count(1 - channel), 0);
        }
    }
}
