//! The library components of the game. They hold the board and its rules, a session that drives a
//! single game from its first tile to its end, and the terminal front end built on top of it.
//!
//! The rules can be used on their own: a [`GameState`] is moved with [`GameState::make_move`],
//! filled with [`GameState::spawn_tile`] and checked with [`GameState::is_terminal`]. The starting
//! point of the playable game is the game.rs file, which contains the outer loop.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The package has not yet been pushed to a remote."
)]

mod board;
mod frame;
mod game;
mod input;
mod messages;
mod session;
mod state;

pub use board::{combine, deflate, tile_value, Board, Row, Score, Tile, SIZE};
pub use game::init;
pub use session::{Command, Phase, Session};
pub use state::{Direction, GameState, NoSpaceError, Spawn, UniformSource};
