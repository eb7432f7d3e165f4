//! Turn-taking match state machine layered on [`Board`].

use super::board::{Board, BoardError};
use super::snapshot::{RenderState, SeatView};
use super::types::{Cell, Line, OccupiedPolicy, Outcome, Player, Slot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Default cap on display-name length, in characters.
pub const DEFAULT_NAME_LIMIT: usize = 20;

/// Match-level stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Phase {
    /// Waiting for seat A's name.
    NamingA,
    /// Waiting for seat B's name.
    NamingB,
    /// A round is being played.
    Playing,
    /// The last round ended; waiting for a reset.
    RoundOver,
}

/// Error returned by match transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum MatchError {
    /// The action is not permitted in the current phase.
    #[display("{} is not allowed during {}", action, phase)]
    InvalidPhase {
        /// Attempted action.
        action: &'static str,
        /// Phase at the time of the attempt.
        phase: Phase,
    },

    /// The board refused the placement.
    #[display("{}", _0)]
    #[from]
    Board(BoardError),
}

/// Result of a move submitted by a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Submitted by the seat whose turn it is not; nothing changed.
    Ignored,
    /// The round continues with `next` to move.
    Continued {
        /// Seat now on turn.
        next: Slot,
    },
    /// The move completed a line.
    Won {
        /// Completed line.
        line: Line,
        /// Seat credited with the round.
        winner: Slot,
    },
    /// The board filled with no line.
    Drawn,
}

impl MoveOutcome {
    /// True if the match changed.
    pub fn changed(&self) -> bool {
        !matches!(self, MoveOutcome::Ignored)
    }
}

/// Name and score of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Seat {
    name: String,
    score: u32,
}

impl Seat {
    /// Display name, empty until the naming phase assigns it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rounds won.
    pub fn score(&self) -> u32 {
        self.score
    }
}

/// A running match between seats A and B.
///
/// The match has no terminal state: after each round it waits in
/// [`Phase::RoundOver`] until [`Match::reset_round`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    board: Board,
    turn: Player,
    phase: Phase,
    seats: [Seat; 2],
    round: u32,
    revision: u64,
    last_outcome: Outcome,
    name_limit: usize,
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

impl Match {
    /// Creates a match waiting for seat A's name.
    pub fn new() -> Self {
        Self::with_rules(OccupiedPolicy::default(), DEFAULT_NAME_LIMIT)
    }

    /// Creates a match with an explicit occupied-cell policy and name cap.
    #[instrument]
    pub fn with_rules(policy: OccupiedPolicy, name_limit: usize) -> Self {
        Self {
            board: Board::with_policy(policy),
            turn: Player::A,
            phase: Phase::NamingA,
            seats: Default::default(),
            round: 1,
            revision: 0,
            last_outcome: Outcome::Ongoing,
            name_limit: name_limit.max(1),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Seat on turn.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Name and score for `slot`.
    pub fn seat(&self, slot: Slot) -> &Seat {
        &self.seats[slot.index()]
    }

    /// Rounds started, beginning at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Longest name kept, in characters.
    pub fn name_limit(&self) -> usize {
        self.name_limit
    }

    /// Seat whose name is being prompted for, if any.
    pub fn naming_slot(&self) -> Option<Slot> {
        match self.phase {
            Phase::NamingA => Some(Player::A),
            Phase::NamingB => Some(Player::B),
            Phase::Playing | Phase::RoundOver => None,
        }
    }

    /// Assigns the name of the seat being prompted and advances the phase.
    ///
    /// Naming A also clears B's name so the second prompt starts fresh.
    /// Naming B starts play with A on turn.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn submit_name(&mut self, text: &str) -> Result<Phase, MatchError> {
        let slot = self.naming_slot().ok_or_else(|| {
            warn!("Name submitted outside naming");
            MatchError::InvalidPhase {
                action: "submit_name",
                phase: self.phase,
            }
        })?;

        let name = self.clean_name(text, slot);
        info!(%slot, name = %name, "Seat named");
        self.seats[slot.index()].name = name;

        self.phase = match slot {
            Player::A => {
                self.seats[Player::B.index()].name.clear();
                Phase::NamingB
            }
            Player::B => {
                self.turn = Player::A;
                Phase::Playing
            }
        };
        self.revision += 1;
        Ok(self.phase)
    }

    /// Applies a move for `slot` at `(row, col)`.
    ///
    /// Moves from the seat not on turn are ignored. A win credits `slot` and
    /// ends the round; a draw ends it without scoring. Otherwise the turn
    /// passes, except after toggling an occupied cell, which keeps the mover
    /// on turn.
    #[instrument(skip(self), fields(phase = %self.phase, turn = %self.turn))]
    pub fn apply_move(&mut self, slot: Slot, row: usize, col: usize) -> Result<MoveOutcome, MatchError> {
        if self.phase != Phase::Playing {
            debug!("Move outside play");
            return Err(MatchError::InvalidPhase {
                action: "apply_move",
                phase: self.phase,
            });
        }
        if slot != self.turn {
            debug!("Move out of turn ignored");
            return Ok(MoveOutcome::Ignored);
        }

        let toggled = self.board.cell(row, col).and_then(Cell::mark).is_some();
        let outcome = self.board.place(row, col, slot)?;
        self.last_outcome = outcome;
        self.revision += 1;

        let result = match outcome {
            Outcome::Win { line, mark } => {
                self.seats[slot.index()].score += 1;
                self.phase = Phase::RoundOver;
                info!(%line, %mark, winner = %slot, score = self.seats[slot.index()].score, "Round won");
                MoveOutcome::Won { line, winner: slot }
            }
            Outcome::Draw => {
                self.phase = Phase::RoundOver;
                info!("Round drawn");
                MoveOutcome::Drawn
            }
            Outcome::Ongoing if toggled => {
                debug!(%slot, "Toggle keeps the turn");
                MoveOutcome::Continued { next: self.turn }
            }
            Outcome::Ongoing => {
                self.turn = self.turn.opponent();
                MoveOutcome::Continued { next: self.turn }
            }
        };
        Ok(result)
    }

    /// Clears the board for the next round, keeping turn and scores.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn reset_round(&mut self) -> Result<(), MatchError> {
        if self.phase != Phase::RoundOver {
            debug!("Reset outside round over");
            return Err(MatchError::InvalidPhase {
                action: "reset_round",
                phase: self.phase,
            });
        }
        self.board.reset();
        self.phase = Phase::Playing;
        self.last_outcome = Outcome::Ongoing;
        self.round += 1;
        self.revision += 1;
        info!(round = self.round, turn = %self.turn, "Round reset");
        Ok(())
    }

    /// Copies the render-relevant state.
    pub fn snapshot(&self) -> RenderState {
        RenderState {
            cells: self.board.cells(),
            seats: self.seats.each_ref().map(|seat| SeatView {
                name: seat.name.clone(),
                score: seat.score,
            }),
            phase: self.phase,
            turn: self.turn,
            round: self.round,
            revision: self.revision,
            outcome: self.last_outcome,
        }
    }

    fn clean_name(&self, text: &str, slot: Slot) -> String {
        let name: String = text.trim().chars().take(self.name_limit).collect();
        if name.is_empty() {
            format!("Player {}", slot.index() + 1)
        } else {
            name
        }
    }
}
