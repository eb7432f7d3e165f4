//! Core domain types for the 3×3 marking game.

use serde::{Deserialize, Serialize};

/// One of the two participants.
///
/// The same type names the mark a player places ([`Mark`]) and the fixed
/// seat a session binds to ([`Slot`]): seat A always plays mark A.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// First seat (moves first, drawn as `○`).
    A,
    /// Second seat (drawn as `×`).
    B,
}

/// Alias used where a player is acting as a board mark.
pub type Mark = Player;

/// Alias used where a player is acting as a session seat.
pub type Slot = Player;

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Seat number, 0 for A and 1 for B.
    pub fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }
}

/// Which kind of line a struck cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    /// Horizontal line.
    Row,
    /// Vertical line.
    Column,
    /// Top-left to bottom-right.
    MainDiagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

/// One of the eight three-cell winning combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    /// Row 0, 1 or 2.
    Row(u8),
    /// Column 0, 1 or 2.
    Column(u8),
    /// `(0,0) (1,1) (2,2)`.
    MainDiagonal,
    /// `(0,2) (1,1) (2,0)`.
    AntiDiagonal,
}

impl Line {
    /// Every line in evaluation order: rows, then columns, then diagonals.
    pub const ALL: [Line; 8] = [
        Line::Row(0),
        Line::Row(1),
        Line::Row(2),
        Line::Column(0),
        Line::Column(1),
        Line::Column(2),
        Line::MainDiagonal,
        Line::AntiDiagonal,
    ];

    /// The `(row, col)` coordinates covered by this line.
    pub fn cells(self) -> [(usize, usize); 3] {
        match self {
            Line::Row(r) => {
                let r = r as usize;
                [(r, 0), (r, 1), (r, 2)]
            }
            Line::Column(c) => {
                let c = c as usize;
                [(0, c), (1, c), (2, c)]
            }
            Line::MainDiagonal => [(0, 0), (1, 1), (2, 2)],
            Line::AntiDiagonal => [(0, 2), (1, 1), (2, 0)],
        }
    }

    /// The render tag written into the cells of this line once it wins.
    pub fn role(self) -> LineRole {
        match self {
            Line::Row(_) => LineRole::Row,
            Line::Column(_) => LineRole::Column,
            Line::MainDiagonal => LineRole::MainDiagonal,
            Line::AntiDiagonal => LineRole::AntiDiagonal,
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {}", r),
            Line::Column(c) => write!(f, "column {}", c),
            Line::MainDiagonal => write!(f, "main diagonal"),
            Line::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing placed.
    #[default]
    Empty,
    /// Holds a player's mark.
    Marked(Mark),
    /// Part of the winning line; render-only, never counts as a mark.
    Struck(LineRole),
}

impl Cell {
    /// Returns the mark held by this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Marked(mark) => Some(mark),
            Cell::Empty | Cell::Struck(_) => None,
        }
    }
}

/// What happens when a move targets a cell that already holds a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupiedPolicy {
    /// Flip the cell to the opposite mark.
    #[default]
    Toggle,
    /// Refuse the move with [`crate::BoardError::CellOccupied`].
    Reject,
}

/// Result of evaluating the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No line complete and at least one cell free.
    Ongoing,
    /// `mark` completed `line`.
    Win {
        /// The winning line.
        line: Line,
        /// Owner of the three cells.
        mark: Mark,
    },
    /// All nine cells marked with no line complete.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win { mark, .. } => Some(*mark),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }

    /// True once the round cannot continue.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "Ongoing"),
            Outcome::Win { line, mark } => write!(f, "Player {} wins on {}", mark, line),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
