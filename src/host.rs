//! The single serialized mutation path for the shared match.

use crate::broadcast::BroadcastReport;
use crate::config::Settings;
use crate::registry::{Registration, RegistryError, SessionRegistry};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tiktag_rules::{Match, MatchError, MoveOutcome, Phase, RenderState, Slot};
use tracing::{debug, info, instrument};

/// A request to change the match.
///
/// Connection handlers never touch the match directly; they build one of
/// these and hand it to [`MatchHost::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Name the seat currently being prompted.
    SubmitName(String),
    /// Place a mark for `slot`.
    Move {
        /// Acting seat.
        slot: Slot,
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },
    /// Start the next round.
    ResetRound,
}

/// What a successfully submitted command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A name was stored; the match is now in this phase.
    Named(Phase),
    /// A move was processed.
    Moved(MoveOutcome),
    /// The board was cleared.
    Reset,
}

impl Applied {
    fn changed(&self) -> bool {
        match self {
            Applied::Moved(outcome) => outcome.changed(),
            Applied::Named(_) | Applied::Reset => true,
        }
    }
}

/// Owns the one active match and the sessions watching it.
///
/// Mutation holds the match lock only for the read-evaluate-write of a
/// command; the fan-out runs after it is released.
#[derive(Debug)]
pub struct MatchHost {
    game: Mutex<Match>,
    registry: SessionRegistry,
    name_limit: usize,
}

impl MatchHost {
    /// Creates a host from settings.
    #[instrument(skip(settings))]
    pub fn new(settings: &Settings) -> Self {
        let game = Match::with_rules(*settings.occupied_policy(), *settings.name_limit());
        let registry = SessionRegistry::new(
            *settings.channel_capacity(),
            *settings.release_slot_on_disconnect(),
        );
        Self::with_parts(game, registry)
    }

    /// Creates a host around an existing match and registry.
    pub fn with_parts(game: Match, registry: SessionRegistry) -> Self {
        info!(phase = %game.phase(), "Hosting match");
        Self {
            name_limit: game.name_limit(),
            game: Mutex::new(game),
            registry,
        }
    }

    /// Longest name the match keeps; drafts stop growing here.
    pub fn name_limit(&self) -> usize {
        self.name_limit
    }

    /// The session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Registers a session and returns its seat and notification channel.
    #[instrument(skip(self))]
    pub fn connect(&self, id: &str) -> Result<Registration, RegistryError> {
        self.registry.register(id)
    }

    /// Unregisters a session and tells the others.
    #[instrument(skip(self))]
    pub fn disconnect(&self, id: &str) -> Option<Slot> {
        let slot = self.registry.unregister(id);
        if slot.is_some() {
            let report = self.notify();
            debug!(?report, "Seat released");
        }
        slot
    }

    /// Applies `command` atomically and notifies every session if it changed
    /// the match.
    #[instrument(skip(self))]
    pub fn submit(&self, command: Command) -> Result<Applied, MatchError> {
        let (applied, revision) = {
            let mut game = self.lock();
            let applied = match command {
                Command::SubmitName(text) => Applied::Named(game.submit_name(&text)?),
                Command::Move { slot, row, col } => {
                    Applied::Moved(game.apply_move(slot, row, col)?)
                }
                Command::ResetRound => {
                    game.reset_round()?;
                    Applied::Reset
                }
            };
            (applied, applied.changed().then(|| game.revision()))
        };

        if let Some(revision) = revision {
            let report = self.notify();
            debug!(
                revision,
                delivered = report.delivered,
                dropped = report.dropped,
                closed = report.closed,
                "Match changed"
            );
        }
        Ok(applied)
    }

    /// Consistent copy of the current match.
    pub fn snapshot(&self) -> RenderState {
        self.lock().snapshot()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    /// Seat the naming prompt targets, if naming is under way.
    pub fn naming_slot(&self) -> Option<Slot> {
        self.lock().naming_slot()
    }

    /// Seat currently on turn, or being named.
    pub fn acting_slot(&self) -> Slot {
        let game = self.lock();
        game.naming_slot().unwrap_or_else(|| game.turn())
    }

    fn notify(&self) -> BroadcastReport {
        self.registry.broadcast()
    }

    fn lock(&self) -> MutexGuard<'_, Match> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
