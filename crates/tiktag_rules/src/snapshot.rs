//! Render-facing copy of the match.

use super::game::Phase;
use super::types::{Cell, Outcome, Player, Slot};
use serde::{Deserialize, Serialize};

/// Name and score of a seat as shown to viewers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeatView {
    /// Display name.
    pub name: String,
    /// Rounds won.
    pub score: u32,
}

/// Consistent copy of everything a view needs.
///
/// Produced in one piece from a [`crate::Match`], so a snapshot never
/// reflects half of a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    /// Cells in row-major order, including struck line markers.
    pub cells: [Cell; 9],
    /// Seat A then seat B.
    pub seats: [SeatView; 2],
    /// Match phase.
    pub phase: Phase,
    /// Seat on turn.
    pub turn: Player,
    /// Rounds started, beginning at 1.
    pub round: u32,
    /// Revision of the match this was copied from.
    pub revision: u64,
    /// Evaluation after the most recent move of this round.
    pub outcome: Outcome,
}

impl RenderState {
    /// Name and score for `slot`.
    pub fn seat(&self, slot: Slot) -> &SeatView {
        &self.seats[slot.index()]
    }

    /// Seat the naming prompt targets, if naming is under way.
    pub fn naming_slot(&self) -> Option<Slot> {
        match self.phase {
            Phase::NamingA => Some(Player::A),
            Phase::NamingB => Some(Player::B),
            Phase::Playing | Phase::RoundOver => None,
        }
    }

    /// Cell at `(row, col)`; out-of-range coordinates read as empty.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row < 3 && col < 3 {
            self.cells[row * 3 + col]
        } else {
            Cell::Empty
        }
    }
}
