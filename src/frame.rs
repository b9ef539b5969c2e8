//! This module draws the game on the terminal: the score and turn counters, the board, and a line
//! of help under it.

use std::fmt::Write as _;

use anyhow::Result;
use console::{pad_str, style, Alignment, Color, Term};

use crate::board::{tile_value, Row, Tile};
use crate::messages::footer;
use crate::session::Phase;
use crate::state::GameState;

/// The number of terminal columns taken by a single tile.
const CELL_WIDTH: usize = 5;

/// The 256-colour palette entries tiles are drawn with, indexed by exponent. Tiles past the end
/// reuse the last entry.
const PALETTE: [u8; 12] = [240, 255, 229, 215, 209, 203, 197, 227, 221, 214, 208, 196];

/// This function clears the terminal and draws the whole game on it, followed by the line that
/// matches the phase of the session.
pub(crate) fn draw_game(term: &Term, state: &GameState, phase: Phase) -> Result<()> {
    term.clear_screen()?;
    term.write_line(&format!("{}", style(header(state)).bold()))?;
    term.write_line("")?;

    for row in state.board().rows() {
        term.write_line(&render_row(row)?)?;
    }

    term.write_line("")?;
    term.write_line(footer(phase))?;
    Ok(())
}

/// This function builds the line holding the score and the number of turns.
pub(crate) fn header(state: &GameState) -> String {
    format!("Score: {:>6}  Turns: {:>4}", state.score(), state.turns())
}

/// This function lays out a row of tiles, each one right-aligned in its own cell and coloured by
/// its exponent.
pub(crate) fn render_row(row: &Row) -> Result<String> {
    let mut output = String::new();

    for tile in row {
        let label = tile_label(*tile);
        let cell = pad_str(&label, CELL_WIDTH, Alignment::Right, None);
        let color = usize::try_from(*tile)
            .ok()
            .and_then(|index| PALETTE.get(index))
            .or(PALETTE.last())
            .copied()
            .unwrap_or_default();

        let styled = style(cell).fg(Color::Color256(color));

        if *tile == 0 {
            write!(output, "{styled}")?;
        } else {
            write!(output, "{}", styled.bold())?;
        }
    }

    Ok(output)
}

/// This function returns the text a tile is drawn with: a dot for an empty cell, the number it
/// stands for otherwise, or `2^k` when that number is too large to be printed in full.
pub(crate) fn tile_label(tile: Tile) -> String {
    match tile {
        0 => ".".to_owned(),
        _ => tile_value(tile).map_or_else(|| format!("2^{tile}"), |value| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use console::strip_ansi_codes;

    use super::{header, render_row, tile_label};
    use crate::board::Board;
    use crate::state::{Direction, GameState};

    #[test]
    fn labels() {
        assert_eq!(tile_label(0), ".");
        assert_eq!(tile_label(1), "2");
        assert_eq!(tile_label(17), "131072");
        assert_eq!(tile_label(64), "2^64");
    }

    #[test]
    fn rows_are_right_aligned() -> Result<()> {
        let row = render_row(&[0, 1, 11, 0])?;

        assert_eq!(strip_ansi_codes(&row), "    .    2 2048    .");
        Ok(())
    }

    #[test]
    fn header_pads_counters() {
        let mut state =
            GameState::from_board(Board::from_rows([[3, 3, 0, 0], [0; 4], [0; 4], [0; 4]]));
        assert!(state.make_move(Direction::Right));

        assert_eq!(header(&state), "Score:     16  Turns:    1");
    }
}
