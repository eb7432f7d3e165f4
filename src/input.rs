//! Key names coming from the transport and what they mean in each phase.

use derive_more::{Display, Error};
use std::str::FromStr;
use strum::IntoEnumIterator;
use tiktag_rules::Phase;

/// A key press as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// `enter`
    Enter,
    /// `esc`
    Esc,
    /// `backspace`
    Backspace,
    /// `ctrl+c`
    CtrlC,
}

/// Key name the transport sent that is not a known key.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unknown key: {:?}", _0)]
pub struct UnknownKey(#[error(not(source))] pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enter" => Ok(Key::Enter),
            "esc" => Ok(Key::Esc),
            "backspace" => Ok(Key::Backspace),
            "ctrl+c" => Ok(Key::CtrlC),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(UnknownKey(s.to_string())),
                }
            }
        }
    }
}

/// Per-session screen selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter)]
pub enum View {
    /// Name prompt.
    Prompt,
    /// Scores and board.
    #[default]
    Board,
    /// Title card.
    Title,
}

impl View {
    /// View selected by digit `0`, `1` or `2`, in declaration order.
    pub fn from_digit(c: char) -> Option<Self> {
        let digit = c.to_digit(10)?;
        View::iter().nth(digit as usize)
    }
}

/// What a key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append to the name draft.
    Type(char),
    /// Remove the last draft character.
    Erase,
    /// Submit the name draft.
    SubmitName,
    /// Place a mark.
    Move {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },
    /// Start the next round.
    Reset,
    /// Change this session's screen.
    SwitchView(View),
    /// Leave.
    Quit,
}

impl Action {
    /// Maps `key` to an action for the given phase, or `None` if unmapped.
    pub fn from_key(key: Key, phase: Phase) -> Option<Self> {
        if key == Key::CtrlC {
            return Some(Action::Quit);
        }
        match phase {
            Phase::NamingA | Phase::NamingB => match key {
                Key::Char(c) if !c.is_control() => Some(Action::Type(c)),
                Key::Backspace => Some(Action::Erase),
                Key::Enter => Some(Action::SubmitName),
                _ => None,
            },
            Phase::Playing | Phase::RoundOver => match key {
                Key::Char(c) => move_for(c)
                    .map(|(row, col)| Action::Move { row, col })
                    .or_else(|| View::from_digit(c).map(Action::SwitchView)),
                Key::Esc => Some(Action::Reset),
                _ => None,
            },
        }
    }
}

/// Nine-key layout: `q w e / a s d / z x c`.
pub fn move_for(c: char) -> Option<(usize, usize)> {
    match c {
        'q' => Some((0, 0)),
        'w' => Some((0, 1)),
        'e' => Some((0, 2)),
        'a' => Some((1, 0)),
        's' => Some((1, 1)),
        'd' => Some((1, 2)),
        'z' => Some((2, 0)),
        'x' => Some((2, 1)),
        'c' => Some((2, 2)),
        _ => None,
    }
}
