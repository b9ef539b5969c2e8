//! The state module owns a game in progress: the board, the number of turns played and the score.
//!
//! Every state transition the game knows about lives here. Moves, tile spawns and the check for a
//! lost game all go through [`GameState`].

use fastrand::Rng;
use log::debug;

use crate::board::{combine, deflate, Board, Score, Tile};

/// The error returned when a tile has to be spawned on a board without a single empty cell.
///
/// It is not a loss by itself, since a full board may still have a move left.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no empty cell left to place a tile in")]
pub struct NoSpaceError;

/// The four directions tiles can be pushed towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Pushes every column towards the bottom edge.
    Down,
    /// Pushes every row towards the left edge.
    Left,
    /// Pushes every row towards the right edge.
    Right,
    /// Pushes every column towards the top edge.
    Up,
}

impl Direction {
    /// Every direction, in the order a lost game is probed with.
    pub const ALL: [Self; 4] = [Self::Left, Self::Up, Self::Down, Self::Right];

    /// The number of clockwise quarter turns that bring this direction onto a leftward move.
    const fn rotations(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Down => 1,
            Self::Right => 2,
            Self::Up => 3,
        }
    }
}

/// A source of uniformly distributed integers, used to place new tiles.
pub trait UniformSource {
    /// Returns an integer picked uniformly from `0..bound`. `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;
}

impl UniformSource for Rng {
    fn below(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }
}

impl<R: UniformSource + ?Sized> UniformSource for &mut R {
    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

/// The cell a freshly spawned tile landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    /// The column of the new tile.
    pub col: usize,
    /// The row of the new tile.
    pub row: usize,
    /// The exponent of the new tile, `1` or `2`.
    pub tile: Tile,
}

/// The state of a single game: its board, the number of turns that changed it, and the score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// The grid of tiles.
    board: Board,
    /// The sum of `2^k` over every merge, `k` being the exponent of the merged tile.
    score: Score,
    /// The number of moves that changed the board.
    turns: u32,
}

impl GameState {
    /// Returns the board of the game.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Builds a game around an existing board, with no turns played and no score.
    #[must_use]
    pub const fn from_board(board: Board) -> Self {
        Self {
            board,
            score: 0,
            turns: 0,
        }
    }

    /// Tells whether the game is lost, that is, whether no direction changes the board anymore.
    ///
    /// The check runs every move on a copy of the state and compares the turn counter, so the
    /// live game is never touched.
    ///
    /// A board holding at least one tile and one empty cell is never lost. A board without any
    /// tile is reported as lost too, since no move changes it; a game built with
    /// [`GameState::start`] never gets there, as it opens with two tiles.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        let mut probe = self.clone();

        for direction in Direction::ALL {
            let _moved = probe.make_move(direction);
        }

        probe.turns == self.turns
    }

    /// Pushes every tile in `direction`, merging equal neighbours along the way.
    ///
    /// The board is rotated so that the move becomes a leftward one, every row is deflated,
    /// combined and deflated again, and the board is then rotated back. The turn counter only
    /// grows when some row changed. Returns whether the board changed, which is what decides if
    /// a new tile should be spawned afterwards.
    pub fn make_move(&mut self, direction: Direction) -> bool {
        let turns = direction.rotations();
        let mut changed = false;

        self.board.rotate(turns);
        for row in self.board.rows_mut() {
            changed |= deflate(row);
            changed |= combine(row, &mut self.score);
            changed |= deflate(row);
        }
        self.board.rotate(4 - turns);

        if changed {
            self.turns = self.turns.saturating_add(1);
        }

        changed
    }

    /// Returns the highest exponent on the board.
    #[must_use]
    pub fn max_tile(&self) -> Tile {
        self.board.max_tile()
    }

    /// Creates a game with an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self::from_board(Board::new())
    }

    /// Returns the score of the game.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Places a new tile on a random empty cell. The cell is picked uniformly among the empty
    /// ones, in row-major order, and the tile is a `2` nine times out of ten and a `4` otherwise.
    ///
    /// Neither the score nor the turn counter are affected.
    ///
    /// # Errors
    ///
    /// Returns [`NoSpaceError`] when the board is full.
    pub fn spawn_tile<R: UniformSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Spawn, NoSpaceError> {
        let empty = self.board.empty_count();
        if empty == 0 {
            return Err(NoSpaceError);
        }

        let nth = rng.below(empty);
        let tile = if rng.below(10) == 0 { 2 } else { 1 };
        let (row, col) = self.board.set_nth_empty(nth, tile).ok_or(NoSpaceError)?;
        debug!("spawned tile {tile} at ({row}, {col})");

        Ok(Spawn { col, row, tile })
    }

    /// Creates a game ready to be played: an empty board with two tiles spawned on it.
    #[must_use]
    pub fn start<R: UniformSource + ?Sized>(rng: &mut R) -> Self {
        let mut state = Self::new();

        for _ in 0..2 {
            if let Err(err) = state.spawn_tile(rng) {
                debug!("initial spawn skipped: {err}");
            }
        }

        state
    }

    /// Returns the number of moves that changed the board so far.
    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    reason = "The boards built here are fixed-size arrays indexed within their bounds."
)]
pub(crate) mod tests {
    use std::array;
    use std::collections::VecDeque;

    use fastrand::Rng;
    use proptest::prelude::*;

    use super::{Direction, GameState, NoSpaceError, Spawn, UniformSource};
    use crate::board::{tile_value, Board, Row, SIZE};

    /// A random source that replays a fixed list of draws, clamped to the requested bound.
    pub(crate) struct Scripted(VecDeque<usize>);

    impl Scripted {
        /// Creates a source that hands out `draws` in order, then zeros.
        pub(crate) fn new(draws: &[usize]) -> Self {
            Self(draws.iter().copied().collect())
        }
    }

    impl UniformSource for Scripted {
        fn below(&mut self, bound: usize) -> usize {
            self.0.pop_front().unwrap_or(0).min(bound - 1)
        }
    }

    /// Reverses the order of the tiles in every row.
    fn mirror(board: &Board) -> Board {
        let mut rows = *board.rows();
        for row in &mut rows {
            row.reverse();
        }
        Board::from_rows(rows)
    }

    /// Swaps rows and columns.
    fn transpose(board: &Board) -> Board {
        Board::from_rows(array::from_fn(|row| {
            array::from_fn(|col| board.get(col, row).unwrap_or_default())
        }))
    }

    /// Moves a board in `direction` and returns the result.
    fn moved(board: Board, direction: Direction) -> Board {
        let mut state = GameState::from_board(board);
        let _moved = state.make_move(direction);
        *state.board()
    }

    /// A full board where no two neighbours are equal.
    const CHECKERED: [Row; SIZE] = [[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]];

    #[test]
    fn pair_merges_leftwards() {
        let mut state =
            GameState::from_board(Board::from_rows([[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]));

        assert!(state.make_move(Direction::Left));
        assert_eq!(state.board().rows()[0], [2, 0, 0, 0]);
        assert_eq!(state.score(), 4);
        assert_eq!(state.turns(), 1);
    }

    #[test]
    fn packed_tile_does_not_move() {
        let mut state =
            GameState::from_board(Board::from_rows([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]));

        assert!(!state.make_move(Direction::Left));
        assert_eq!(state.turns(), 0);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn directions_push_to_their_edge() {
        let board = Board::from_rows([[0, 0, 0, 0], [0, 3, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

        assert_eq!(moved(board, Direction::Left).get(1, 0), Some(3));
        assert_eq!(moved(board, Direction::Right).get(1, 3), Some(3));
        assert_eq!(moved(board, Direction::Up).get(0, 1), Some(3));
        assert_eq!(moved(board, Direction::Down).get(3, 1), Some(3));
    }

    #[test]
    fn down_merges_columns() {
        let mut state = GameState::from_board(Board::from_rows([
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [0; 4],
        ]));

        assert!(state.make_move(Direction::Down));
        assert_eq!(
            state.board().rows(),
            &[[0; 4], [0; 4], [2, 0, 0, 0], [3, 0, 0, 0]]
        );
        assert_eq!(state.score(), 8);
    }

    #[test]
    fn checkered_board_is_terminal() {
        let state = GameState::from_board(Board::from_rows(CHECKERED));

        assert!(state.is_terminal());
        assert_eq!(state.turns(), 0);
    }

    #[test]
    fn board_without_tiles_is_terminal() {
        assert!(GameState::new().is_terminal());

        let mut single = GameState::new();
        let _spawn = single.spawn_tile(&mut Scripted::new(&[0, 1]));
        assert!(!single.is_terminal());
    }

    #[test]
    fn full_board_with_a_pair_is_not_terminal() {
        let mut rows = CHECKERED;
        rows[3][3] = 2;
        let state = GameState::from_board(Board::from_rows(rows));

        assert!(!state.is_terminal());
        assert_eq!(state.board().rows(), &rows);
    }

    #[test]
    fn spawn_fills_the_only_empty_cell() {
        let mut rows = CHECKERED;
        rows[2][1] = 0;

        for draws in [[0, 0], [0, 5], [3, 9]] {
            let mut state = GameState::from_board(Board::from_rows(rows));
            let spawn = state.spawn_tile(&mut Scripted::new(&draws));

            assert!(matches!(spawn, Ok(Spawn { row: 2, col: 1, tile: 1 | 2 })));
            assert_eq!(state.board().get(2, 1), spawn.ok().map(|placed| placed.tile));
        }
    }

    #[test]
    fn spawn_weights_four_one_in_ten() {
        let mut state = GameState::new();

        assert_eq!(
            state.spawn_tile(&mut Scripted::new(&[5, 0])),
            Ok(Spawn { col: 1, row: 1, tile: 2 })
        );
        assert_eq!(
            state.spawn_tile(&mut Scripted::new(&[0, 7])),
            Ok(Spawn { col: 0, row: 0, tile: 1 })
        );
        assert_eq!(state.score(), 0);
        assert_eq!(state.turns(), 0);
    }

    #[test]
    fn spawn_on_full_board_fails() {
        let mut state = GameState::from_board(Board::from_rows(CHECKERED));

        assert_eq!(state.spawn_tile(&mut Rng::with_seed(7)), Err(NoSpaceError));
        assert_eq!(state.board().rows(), &CHECKERED);
    }

    #[test]
    fn start_places_two_tiles() {
        let state = GameState::start(&mut Rng::with_seed(2048));

        assert_eq!(state.board().empty_count(), SIZE * SIZE - 2);
        assert!(state.board().tiles().all(|tile| tile <= 2));
        assert_eq!(state.turns(), 0);
        assert_eq!(state, GameState::start(&mut Rng::with_seed(2048)));
    }

    #[test]
    fn max_tile_reports_highest_exponent() {
        let state = GameState::from_board(Board::from_rows([
            [0, 4, 0, 0],
            [0; 4],
            [0, 0, 9, 0],
            [1; 4],
        ]));

        assert_eq!(state.max_tile(), 9);
        assert_eq!(GameState::new().max_tile(), 0);
    }

    /// Generates whole boards of small exponents.
    fn arb_board() -> impl Strategy<Value = Board> {
        prop::array::uniform4(prop::array::uniform4(0_u32..5)).prop_map(Board::from_rows)
    }

    /// Generates any of the four directions.
    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn right_is_mirrored_left(board in arb_board()) {
            prop_assert_eq!(
                moved(board, Direction::Right),
                mirror(&moved(mirror(&board), Direction::Left))
            );
        }

        #[test]
        fn up_is_transposed_left(board in arb_board()) {
            prop_assert_eq!(
                moved(board, Direction::Up),
                transpose(&moved(transpose(&board), Direction::Left))
            );
        }

        #[test]
        fn down_is_transposed_right(board in arb_board()) {
            prop_assert_eq!(
                moved(board, Direction::Down),
                transpose(&moved(transpose(&board), Direction::Right))
            );
        }

        #[test]
        fn turns_count_changing_moves(
            board in arb_board(),
            directions in prop::collection::vec(arb_direction(), 1..20),
        ) {
            let mut state = GameState::from_board(board);

            for direction in directions {
                let before = state.clone();
                let changed = state.make_move(direction);

                prop_assert_eq!(changed, state.board() != before.board());
                prop_assert_eq!(state.turns(), before.turns() + u32::from(changed));
                prop_assert!(state.score() >= before.score());
            }
        }

        #[test]
        fn moves_conserve_tile_values(board in arb_board(), direction in arb_direction()) {
            let sum = |board: &Board| -> u64 { board.tiles().filter_map(tile_value).sum() };

            prop_assert_eq!(sum(&board), sum(&moved(board, direction)));
        }

        #[test]
        fn boards_with_room_are_never_terminal(board in arb_board(), cell in 0_usize..SIZE * SIZE) {
            let mut rows = *board.rows();
            let other = (cell + 1) % (SIZE * SIZE);
            rows[cell / SIZE][cell % SIZE] = 0;
            rows[other / SIZE][other % SIZE] = rows[other / SIZE][other % SIZE].max(1);
            let state = GameState::from_board(Board::from_rows(rows));

            prop_assert!(!state.is_terminal());
        }
    }
}
