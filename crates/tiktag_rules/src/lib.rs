//! Pure game logic for tiktag: the 3×3 board, win/draw evaluation and the
//! two-seat match state machine.
//!
//! Nothing here performs I/O or synchronization; callers that share a
//! [`Match`] between tasks serialize access themselves.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod game;
mod snapshot;
mod types;

pub use board::{Board, BoardError};
pub use game::{DEFAULT_NAME_LIMIT, Match, MatchError, MoveOutcome, Phase, Seat};
pub use snapshot::{RenderState, SeatView};
pub use types::{Cell, Line, LineRole, Mark, OccupiedPolicy, Outcome, Player, Slot};
