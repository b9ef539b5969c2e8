//! The session module ties a [`GameState`] to its random source and tracks where in its lifetime
//! a game is. It is what the outer loop drives: it starts the game, feeds it commands and asks
//! whether it is over.

use log::{debug, info};

use crate::state::{Direction, GameState, UniformSource};

/// An action requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pushes the tiles in the given direction.
    Move(Direction),
    /// Leaves the game, whatever the board looks like.
    Quit,
}

/// The stage of its lifetime a session is in.
#[expect(
    clippy::arbitrary_source_item_ordering,
    reason = "The variants are listed in the order a session goes through them."
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The board is still empty; no tile has been spawned yet.
    NotStarted,
    /// The game accepts moves.
    Playing,
    /// No move changes the board anymore.
    Lost,
    /// The player left the game.
    Quit,
}

impl Phase {
    /// Tells whether the session reached one of its final phases.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Lost | Self::Quit)
    }
}

/// A single game from its first tile until it is lost or abandoned.
#[derive(Debug)]
pub struct Session<R> {
    /// The current stage of the session.
    phase: Phase,
    /// The source of randomness used for every spawned tile.
    rng: R,
    /// The game being played.
    state: GameState,
}

impl<R: UniformSource> Session<R> {
    /// Feeds a command to the game and returns the phase the session is left in.
    ///
    /// A move that changes the board is followed by a new tile. If the board has no room left
    /// for it, the tile is simply not placed; that alone never ends the game, the next call to
    /// [`Session::check`] does. Commands are ignored outside of [`Phase::Playing`].
    pub fn apply(&mut self, command: Command) -> Phase {
        if self.phase != Phase::Playing {
            return self.phase;
        }

        match command {
            Command::Quit => {
                info!(
                    "game quit with a score of {} after {} turns",
                    self.state.score(),
                    self.state.turns()
                );
                self.phase = Phase::Quit;
            }
            Command::Move(direction) => {
                if self.state.make_move(direction) {
                    debug!(
                        "moved {direction:?}: score = {}, turns = {}",
                        self.state.score(),
                        self.state.turns()
                    );
                    if let Err(err) = self.state.spawn_tile(&mut self.rng) {
                        debug!("no tile spawned after moving {direction:?}: {err}");
                    }
                }
            }
        }

        self.phase
    }

    /// Moves a session that is being played into [`Phase::Lost`] once no direction changes the
    /// board anymore. Returns the phase the session is left in.
    pub fn check(&mut self) -> Phase {
        if self.phase == Phase::Playing && self.state.is_terminal() {
            info!(
                "game lost with a score of {} after {} turns",
                self.state.score(),
                self.state.turns()
            );
            self.phase = Phase::Lost;
        }

        self.phase
    }

    /// Creates a session that has not started yet, drawing its tiles from `rng`.
    pub const fn new(rng: R) -> Self {
        Self {
            phase: Phase::NotStarted,
            rng,
            state: GameState::new(),
        }
    }

    /// Returns the current stage of the session.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Spawns the two opening tiles and lets the game be played. Does nothing once the session
    /// has started.
    pub fn start(&mut self) -> Phase {
        if self.phase == Phase::NotStarted {
            self.state = GameState::start(&mut self.rng);
            self.phase = Phase::Playing;
            info!("game started");
        }

        self.phase
    }

    /// Returns the game being played, for rendering.
    pub const fn state(&self) -> &GameState {
        &self.state
    }
}
