//! Tik-Tag: a two-seat tic-tac-toe match shared between sessions.
//!
//! # Architecture
//!
//! - **Rules** ([`tiktag_rules`]): board, win/draw evaluation, match phases
//! - **Host**: the single lock-guarded path every mutation goes through
//! - **Registry**: session-to-seat binding and bounded notification mailboxes
//! - **Handler**: maps one session's keys to host commands
//! - **Transport / Local**: TCP sessions and the hot-seat terminal
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tiktag::{Command, MatchHost, Settings};
//!
//! let host = Arc::new(MatchHost::new(&Settings::default()));
//! let reg = host.connect("alice").unwrap();
//! host.submit(Command::SubmitName("Alice".into())).unwrap();
//! assert_eq!(host.snapshot().seat(reg.slot).name, "Alice");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod broadcast;
mod config;
mod handler;
mod host;
mod input;
mod registry;

pub mod local;
pub mod transport;
pub mod view;

pub use broadcast::{BroadcastReport, Broadcaster, Mailbox, StateChanged};
pub use config::{ConfigError, Settings};
pub use handler::{Reply, SessionHandler};
pub use host::{Applied, Command, MatchHost};
pub use input::{Action, Key, UnknownKey, View, move_for};
pub use registry::{Registration, RegistryError, SessionId, SessionRegistry};

pub use tiktag_rules::{
    Board, BoardError, Cell, Line, LineRole, Mark, Match, MatchError, MoveOutcome, OccupiedPolicy,
    Outcome, Phase, Player, RenderState, Seat, SeatView, Slot,
};
