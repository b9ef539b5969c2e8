//! The board module holds the grid of tiles and the row transformations every move is built from.
//!
//! Only the leftward transformation exists here. The other three directions are obtained by
//! rotating the whole board before and after, which the `state` module takes care of.

use std::array;

/// The width and height of the square board.
pub const SIZE: usize = 4;

/// A single cell of the board, stored as the exponent of the number it displays. An empty cell is
/// `0`, and any other value `k` stands for the number `2^k`.
pub type Tile = u32;

/// One horizontal line of tiles, from the leftmost column to the rightmost one.
pub type Row = [Tile; SIZE];

/// The cumulative score of a game.
pub type Score = u64;

/// A fixed-size square grid of tiles, addressed in row-major order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    /// The rows of the board, top to bottom.
    cells: [Row; SIZE],
}

impl Board {
    /// Counts the cells that hold no tile.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.tiles().filter(|tile| *tile == 0).count()
    }

    /// Builds a board from its rows, top to bottom.
    #[must_use]
    pub const fn from_rows(cells: [Row; SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the number of the tile at the given position, or `None` if the position lies
    /// outside of the board.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Returns the highest exponent on the board, `0` when the board is empty.
    #[must_use]
    pub fn max_tile(&self) -> Tile {
        self.tiles().max().unwrap_or(0)
    }

    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[0; SIZE]; SIZE],
        }
    }

    /// Turns the board a quarter clockwise `times` times in a row.
    pub(crate) fn rotate(&mut self, times: usize) {
        for _ in 0..times % 4 {
            self.rotate_clockwise();
        }
    }

    /// Turns the board a quarter clockwise, so that the left column becomes the top row.
    #[expect(
        clippy::indexing_slicing,
        reason = "Both indices come from ranges bounded by the board size."
    )]
    pub(crate) fn rotate_clockwise(&mut self) {
        let before = self.cells;
        self.cells = array::from_fn(|row| array::from_fn(|col| before[SIZE - 1 - col][row]));
    }

    /// Returns the rows of the board, top to bottom.
    #[must_use]
    pub const fn rows(&self) -> &[Row; SIZE] {
        &self.cells
    }

    /// Gives mutable access to every row of the board.
    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.cells.iter_mut()
    }

    /// Writes `tile` into the `nth` empty cell, counting in row-major order from zero. The position
    /// it landed on is returned, or `None` if there are not that many empty cells.
    pub(crate) fn set_nth_empty(&mut self, nth: usize, tile: Tile) -> Option<(usize, usize)> {
        let (row, col, cell) = self
            .cells
            .iter_mut()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter_mut()
                    .enumerate()
                    .map(move |(col, cell)| (row, col, cell))
            })
            .filter(|cell| *cell.2 == 0)
            .nth(nth)?;

        *cell = tile;
        Some((row, col))
    }

    /// Iterates over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().flatten().copied()
    }
}

/// Merges adjacent pairs of equal tiles, scanning from the left.
///
/// The left tile of each pair grows by one exponent and the right one is emptied, while `2^k` of
/// the new exponent `k` is added to `score`. A tile that was just merged does not merge again in
/// the same pass. The row is expected to be deflated already. Returns whether any pair was merged.
pub fn combine(row: &mut Row, score: &mut Score) -> bool {
    let mut did_combine = false;

    for col in 1..SIZE {
        let (left, right) = row.split_at_mut(col);

        if let (Some(left), Some(right)) = (left.last_mut(), right.first_mut()) {
            if *right != 0 && *left == *right {
                *left = left.saturating_add(1);
                *right = 0;
                *score = score.saturating_add(tile_value(*left).unwrap_or(Score::MAX));
                did_combine = true;
            }
        }
    }

    did_combine
}

/// Compacts the tiles of a row against its left edge, keeping their order and filling the rest
/// with empty cells. Returns whether any tile changed position.
pub fn deflate(row: &mut Row) -> bool {
    let mut packed = [0; SIZE];

    for (slot, tile) in packed.iter_mut().zip(row.iter().filter(|tile| **tile != 0)) {
        *slot = *tile;
    }

    let did_deflate = packed != *row;
    *row = packed;
    did_deflate
}

/// Returns the number a tile displays, `0` for an empty cell. `None` means the number does not fit
/// in 64 bits.
#[must_use]
pub const fn tile_value(tile: Tile) -> Option<u64> {
    match tile {
        0 => Some(0),
        _ => 1_u64.checked_shl(tile),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{combine, deflate, tile_value, Board, Row, Score, SIZE};

    /// Adds up the displayed numbers of a row.
    fn row_sum(row: &Row) -> u64 {
        row.iter().filter_map(|tile| tile_value(*tile)).sum()
    }

    /// Applies the full leftward transformation to a single row.
    fn slide(row: &mut Row, score: &mut Score) -> bool {
        let mut changed = deflate(row);
        changed |= combine(row, score);
        changed |= deflate(row);
        changed
    }

    #[test]
    fn deflate_packs_to_the_left() {
        let mut row = [0, 3, 0, 1];

        assert!(deflate(&mut row));
        assert_eq!(row, [3, 1, 0, 0]);
    }

    #[test]
    fn deflate_reports_no_change_on_packed_rows() {
        let mut row = [1, 2, 0, 0];

        assert!(!deflate(&mut row));
        assert_eq!(row, [1, 2, 0, 0]);

        let mut empty = [0; SIZE];
        assert!(!deflate(&mut empty));
    }

    #[test]
    fn combine_merges_each_tile_once() {
        let mut score = 0;
        let mut row = [1, 1, 1, 1];

        assert!(combine(&mut row, &mut score));
        assert_eq!(row, [2, 0, 2, 0]);
        assert_eq!(score, 8);
    }

    #[test]
    fn combine_does_not_chain_merges() {
        let mut score = 0;
        let mut row = [2, 1, 1, 0];

        assert!(slide(&mut row, &mut score));
        assert_eq!(row, [2, 2, 0, 0]);
        assert_eq!(score, 4);
    }

    #[test]
    fn combine_ignores_empty_pairs() {
        let mut score = 0;
        let mut row = [3, 0, 0, 0];

        assert!(!combine(&mut row, &mut score));
        assert_eq!(score, 0);
    }

    #[test]
    fn slide_closes_gaps_after_merging() {
        let mut score = 0;
        let mut row = [1, 1, 2, 0];

        assert!(slide(&mut row, &mut score));
        assert_eq!(row, [2, 2, 0, 0]);
        assert_eq!(score, 4);
    }

    #[test]
    fn huge_merges_saturate_the_score() {
        let mut score = 0;
        let mut row = [64, 64, 0, 0];

        assert!(combine(&mut row, &mut score));
        assert_eq!(row, [65, 0, 0, 0]);
        assert_eq!(score, Score::MAX);
    }

    #[test]
    fn tile_values_evaluate_at_compile_time() {
        const WINNING: Option<u64> = tile_value(11);
        const OVERSIZED: Option<u64> = tile_value(64);

        assert_eq!(WINNING, Some(2048));
        assert_eq!(OVERSIZED, None);
    }

    #[test]
    fn tile_values() {
        assert_eq!(tile_value(0), Some(0));
        assert_eq!(tile_value(1), Some(2));
        assert_eq!(tile_value(11), Some(2048));
        assert_eq!(tile_value(64), None);
    }

    #[test]
    fn rotation_moves_left_column_to_top_row() {
        let mut board = Board::from_rows([
            [1, 2, 3, 4],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 14, 15, 16],
        ]);
        board.rotate_clockwise();

        assert_eq!(
            board.rows(),
            &[
                [13, 9, 5, 1],
                [14, 10, 6, 2],
                [15, 11, 7, 3],
                [16, 12, 8, 4],
            ]
        );
    }

    #[test]
    fn nth_empty_cell_is_counted_row_major() {
        let mut board = Board::from_rows([[1, 0, 1, 1], [1, 1, 1, 1], [0, 1, 1, 1], [1, 1, 1, 0]]);

        assert_eq!(board.set_nth_empty(1, 2), Some((2, 0)));
        assert_eq!(board.get(2, 0), Some(2));
        assert_eq!(board.empty_count(), 2);
        assert_eq!(board.set_nth_empty(2, 1), None);
    }

    #[test]
    fn max_tile_of_empty_board_is_zero() {
        assert_eq!(Board::new().max_tile(), 0);
        assert_eq!(Board::new().empty_count(), SIZE * SIZE);
        assert_eq!(Board::new().get(SIZE, 0), None);
    }

    /// Generates rows of small exponents with plenty of empty cells.
    fn arb_row() -> impl Strategy<Value = Row> {
        prop::array::uniform4(0_u32..6)
    }

    /// Generates whole boards of small exponents.
    fn arb_board() -> impl Strategy<Value = Board> {
        prop::array::uniform4(arb_row()).prop_map(Board::from_rows)
    }

    proptest! {
        #[test]
        fn deflate_is_idempotent(row in arb_row()) {
            let mut once = row;
            let _moved = deflate(&mut once);
            let mut twice = once;

            prop_assert!(!deflate(&mut twice));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn sliding_conserves_tile_values(row in arb_row()) {
            let mut score = 0;
            let mut slid = row;
            let _moved = slide(&mut slid, &mut score);

            prop_assert_eq!(row_sum(&row), row_sum(&slid));
        }

        #[test]
        fn four_rotations_are_the_identity(board in arb_board()) {
            let mut rotated = board;
            rotated.rotate(4);
            prop_assert_eq!(rotated, board);

            for _ in 0..4 {
                rotated.rotate_clockwise();
            }
            prop_assert_eq!(rotated, board);
        }
    }
}
