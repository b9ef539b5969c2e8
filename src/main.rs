//! # twofold
//!
//! This crate is the sliding-tile puzzle 2048, played in the terminal. Tiles are pushed around a
//! four by four board with the arrow keys, and two equal tiles that run into each other merge into
//! one of twice their value. Every move that changes the board brings a new tile in, and the game
//! is lost once no move changes the board anymore.
//!
//! Run it with `--help` to see the available options, such as seeding the tile generator to
//! replay a game.

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use anyhow::Result;
use twofold::init;

fn main() -> Result<()> {
    init()
}
