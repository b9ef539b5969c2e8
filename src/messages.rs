//! This module contains the texts shown to the player around the board, from the key help to the
//! summary printed once a game is over.

use crate::board::tile_value;
use crate::session::Phase;
use crate::state::GameState;

/// The line shown under the board while the game is being played.
pub(crate) const HELP: &str = "Arrows, WASD or hjkl to move; q or Esc to quit.";

/// The line shown under the board once no move is left.
pub(crate) const LOSS_PROMPT: &str = "You lose! Press ENTER to continue.";

/// The line shown at the top of the screen when the game first loads up.
pub(crate) const WELCOME: &str = "Welcome to the game of twofold";

/// This function builds the line under the board that matches the phase of the session.
pub(crate) const fn footer(phase: Phase) -> &'static str {
    match phase {
        Phase::Lost => LOSS_PROMPT,
        Phase::NotStarted | Phase::Playing | Phase::Quit => HELP,
    }
}

/// This function builds the text printed once a game is over. It reports how the game ended, the
/// final score, the number of turns and the largest tile reached.
///
/// The largest tile of an empty board reads as `1`, that is, `2^0`.
pub(crate) fn summary(phase: Phase, state: &GameState) -> String {
    let outcome = match phase {
        Phase::Lost => "lost",
        Phase::NotStarted | Phase::Playing | Phase::Quit => "quit",
    };
    let max = state.max_tile();
    let largest = match max {
        0 => "1".to_owned(),
        _ => tile_value(max).map_or_else(|| format!("2^{max}"), |value| value.to_string()),
    };

    format!(
        "You {outcome} after scoring {} points in {} turns, with largest tile {largest}",
        state.score(),
        state.turns()
    )
}
