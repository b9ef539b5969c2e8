//! This module contains all functions related to taking input from the player. Keys are read
//! unbuffered through the `console` crate, while the question asked between games goes through
//! `dialoguer`.

use anyhow::Result;
use console::{style, Key, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::session::Command;
use crate::state::Direction;

/// This function maps a key onto the command it stands for. Arrow keys, `WASD` and `hjkl` move
/// the tiles, while `q` and the escape key leave the game. Every other key maps to nothing.
pub(crate) const fn command_for_key(key: &Key) -> Option<Command> {
    match *key {
        Key::ArrowLeft | Key::Char('a' | 'A' | 'h' | 'H') => Some(Command::Move(Direction::Left)),
        Key::ArrowRight | Key::Char('d' | 'D' | 'l' | 'L') => {
            Some(Command::Move(Direction::Right))
        }
        Key::ArrowUp | Key::Char('w' | 'W' | 'k' | 'K') => Some(Command::Move(Direction::Up)),
        Key::ArrowDown | Key::Char('s' | 'S' | 'j' | 'J') => Some(Command::Move(Direction::Down)),
        Key::Escape | Key::Char('q' | 'Q') => Some(Command::Quit),
        _ => None,
    }
}

/// This function asks the player whether they want to play another game once the last one is
/// over.
pub(crate) fn play_again(term: &Term) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{}", style("Play another game?").bold()))
        .default(true)
        .interact_on(term)?;

    Ok(answer)
}

/// This function blocks on the next key press and returns the command it maps to, if any.
pub(crate) fn read_command(term: &Term) -> Result<Option<Command>> {
    let key = term.read_key()?;

    Ok(command_for_key(&key))
}

/// This function blocks until the player acknowledges a lost game with the return key, `q` or
/// the escape key.
pub(crate) fn wait_for_acknowledgement(term: &Term) -> Result<()> {
    loop {
        match term.read_key()? {
            Key::Enter | Key::Escape | Key::Char('q' | 'Q') => break Ok(()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use console::Key;

    use super::command_for_key;
    use crate::session::Command;
    use crate::state::Direction;

    #[test]
    fn arrows_and_letters_move() {
        let cases = [
            (Key::ArrowLeft, Direction::Left),
            (Key::Char('a'), Direction::Left),
            (Key::Char('h'), Direction::Left),
            (Key::ArrowRight, Direction::Right),
            (Key::Char('L'), Direction::Right),
            (Key::ArrowUp, Direction::Up),
            (Key::Char('w'), Direction::Up),
            (Key::ArrowDown, Direction::Down),
            (Key::Char('j'), Direction::Down),
        ];

        for (key, direction) in cases {
            assert_eq!(command_for_key(&key), Some(Command::Move(direction)));
        }
    }

    #[test]
    fn quit_keys() {
        assert_eq!(command_for_key(&Key::Escape), Some(Command::Quit));
        assert_eq!(command_for_key(&Key::Char('q')), Some(Command::Quit));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(command_for_key(&Key::Enter), None);
        assert_eq!(command_for_key(&Key::Char('x')), None);
        assert_eq!(command_for_key(&Key::Tab), None);
    }
}
