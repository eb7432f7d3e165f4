//! The 3×3 grid, placement and win/draw evaluation.

use super::types::{Cell, Line, Mark, OccupiedPolicy, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Error returned when a placement cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// Coordinates outside the 3×3 grid.
    #[display("Cell ({}, {}) is outside the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The cell holds a mark and the board rejects overwrites.
    #[display("Cell ({}, {}) is already occupied", row, col)]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The round already ended in a win or draw.
    #[display("Board is settled; reset before placing again")]
    Settled,
}

/// 3×3 board.
///
/// Once a line completes, its three cells are tagged [`Cell::Struck`] and
/// the win is recorded; from then on, and likewise after a draw, the board
/// refuses placements until [`Board::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; 3]; 3],
    winner: Option<(Line, Mark)>,
    policy: OccupiedPolicy,
}

impl Board {
    /// Creates an empty board that toggles occupied cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty board with the given occupied-cell policy.
    pub fn with_policy(policy: OccupiedPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Returns the occupied-cell policy.
    pub fn policy(&self) -> OccupiedPolicy {
        self.policy
    }

    /// Gets the cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> [Cell; 9] {
        let mut out = [Cell::Empty; 9];
        for (i, cell) in self.cells.iter().flatten().enumerate() {
            out[i] = *cell;
        }
        out
    }

    /// True when every cell is empty.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().flatten().all(|c| *c == Cell::Empty)
    }

    /// Places `mark` at `(row, col)` and returns the resulting evaluation.
    ///
    /// An empty cell takes `mark`. An occupied cell is handled according to
    /// the board's [`OccupiedPolicy`]: `Toggle` flips its owner regardless of
    /// who is moving, `Reject` refuses the move.
    #[instrument(skip(self))]
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<Outcome, BoardError> {
        if row >= 3 || col >= 3 {
            return Err(BoardError::OutOfBounds { row, col });
        }
        if self.evaluate().is_terminal() {
            return Err(BoardError::Settled);
        }

        let cell = &mut self.cells[row][col];
        *cell = match (*cell, self.policy) {
            (Cell::Marked(owner), OccupiedPolicy::Toggle) => {
                debug!(?owner, "Toggling occupied cell");
                Cell::Marked(owner.opponent())
            }
            (Cell::Marked(_), OccupiedPolicy::Reject) => {
                return Err(BoardError::CellOccupied { row, col });
            }
            (Cell::Empty, _) | (Cell::Struck(_), _) => Cell::Marked(mark),
        };

        let outcome = self.evaluate();
        if let Outcome::Win { line, mark } = outcome {
            self.strike(line, mark);
        }
        Ok(outcome)
    }

    /// Evaluates the board without changing it.
    ///
    /// Rows are checked before columns before diagonals, by ascending index;
    /// the first complete line is reported.
    pub fn evaluate(&self) -> Outcome {
        if let Some((line, mark)) = self.winner {
            return Outcome::Win { line, mark };
        }

        for line in Line::ALL {
            let [a, b, c] = line.cells().map(|(r, c)| self.cells[r][c]);
            if let Some(mark) = a.mark()
                && a == b
                && b == c
            {
                return Outcome::Win { line, mark };
            }
        }

        if self.cells.iter().flatten().all(|c| c.mark().is_some()) {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// Clears every cell. Scores live on the match, not here.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; 3]; 3];
        self.winner = None;
    }

    fn strike(&mut self, line: Line, mark: Mark) {
        debug!(%line, %mark, "Striking winning line");
        for (r, c) in line.cells() {
            self.cells[r][c] = Cell::Struck(line.role());
        }
        self.winner = Some((line, mark));
    }
}
