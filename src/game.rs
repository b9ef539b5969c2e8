//! The game module contains the outer parts of the game: the command line, the logger and the
//! loop that connects the terminal to a [`Session`].
//!
//! It contains the `init()` function to configure the terminal and run games until the player is
//! done, as well as the loop that plays a single game.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use console::{style, Term};
use env_logger::{Env, Target};
use fastrand::Rng;
use log::info;

use crate::frame::draw_game;
use crate::input::{play_again, read_command, wait_for_acknowledgement};
use crate::messages::{summary, WELCOME};
use crate::session::{Phase, Session};
use crate::state::UniformSource;

/// This struct holds the command-line configuration of the game, parsed with clap. Every option
/// can also be given through an environment variable.
#[derive(Parser)]
#[command(name = "twofold", version, about)]
#[command(next_line_help = true)]
struct Cli {
    /// Write a log of the game to this file.
    ///
    /// The verbosity follows the RUST_LOG environment variable and defaults to `info`; `debug`
    /// records every move and spawned tile. Nothing is logged when this option is absent.
    #[arg(long, env = "TWOFOLD_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Draw the board without colours.
    #[arg(long, env = "TWOFOLD_NO_COLOR")]
    no_color: bool,
    /// The seed for the tile generator.
    ///
    /// Two games started with the same seed and played with the same keys unfold identically.
    /// A random seed is used when this option is absent.
    #[arg(short, long, env = "TWOFOLD_SEED", value_name = "SEED")]
    seed: Option<u64>,
    /// Exit after the first game instead of offering another one.
    #[arg(long, env = "TWOFOLD_SINGLE")]
    single: bool,
}

/// Parses the command line and runs games until the player is done. This is a `main()` function
/// of sorts though it is still called from main.rs.
///
/// The cursor is hidden while the games are running, and shown again before returning, whether
/// the games ended well or not.
///
/// # Errors
///
/// The function may return any one of the following errors:
///
/// - io::Error, from the terminal or the log file
/// - dialoguer::Error
/// - log::SetLoggerError
pub fn init() -> Result<()> {
    let cli = Cli::parse();
    let term = Term::stdout();

    if let Some(path) = cli.log_file.as_deref() {
        init_logger(path)?;
    }
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let mut rng = cli.seed.map_or_else(Rng::new, Rng::with_seed);
    info!("tile generator seeded with {}", rng.get_seed());

    with_hidden_cursor(&term, |term| {
        init_message(term)?;
        run(term, &mut rng, cli.single)
    })
}

/// This function sends every log record to the file at `path`, filtered by the RUST_LOG
/// environment variable.
fn init_logger(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create the log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}

/// This function clears the screen, sets the title of the console window and greets the player.
fn init_message(term: &Term) -> Result<()> {
    term.clear_screen()?;
    term.set_title("twofold");

    term.write_line(&format!("{}", style(WELCOME).bold()))?;
    Ok(())
}

/// This function plays a single game to its end and returns the phase it ended in.
///
/// Each round draws the board, checks for a loss, and then waits for the next key. A loss is shown
/// until the player acknowledges it.
fn play<R: UniformSource>(term: &Term, session: &mut Session<R>) -> Result<Phase> {
    let _phase = session.start();

    loop {
        let phase = session.check();
        draw_game(term, session.state(), phase)?;

        match phase {
            Phase::Lost => {
                wait_for_acknowledgement(term)?;
                break Ok(phase);
            }
            Phase::Quit => break Ok(phase),
            Phase::NotStarted | Phase::Playing => {}
        }

        if let Some(command) = read_command(term)? {
            let _phase = session.apply(command);
        }
    }
}

/// This function plays games one after the other, printing a summary after each of them, until
/// the player declines another one or only a single game was asked for.
fn run(term: &Term, rng: &mut Rng, single: bool) -> Result<()> {
    loop {
        let mut session = Session::new(&mut *rng);
        let phase = play(term, &mut session)?;

        term.write_line(&format!(
            "{}",
            style(summary(phase, session.state())).bold()
        ))?;

        if single || !play_again(term)? {
            break Ok(());
        }
    }
}

/// This function runs `body` with the cursor hidden, and shows the cursor again however `body`
/// returns. An error from `body` takes precedence over one from restoring the cursor.
fn with_hidden_cursor<T, F>(term: &Term, body: F) -> Result<T>
where
    F: FnOnce(&Term) -> Result<T>,
{
    term.hide_cursor()?;
    let outcome = body(term);
    let restored = term.show_cursor();

    let value = outcome?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use console::Term;

    use super::with_hidden_cursor;

    #[test]
    fn hidden_cursor_body_value_is_returned() -> Result<()> {
        let mut calls = 0;
        let value = with_hidden_cursor(&Term::stdout(), |_| {
            calls += 1;
            Ok(7)
        })?;

        assert_eq!(value, 7);
        assert_eq!(calls, 1);
        Ok(())
    }

    #[test]
    fn hidden_cursor_body_error_is_returned() {
        let outcome: Result<()> =
            with_hidden_cursor(&Term::stdout(), |_| Err(anyhow!("terminal went away")));

        assert_eq!(
            outcome.map_err(|err| err.to_string()),
            Err("terminal went away".to_owned())
        );
    }
}
