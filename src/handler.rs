//! Turns one session's key presses into match commands.

use crate::host::{Applied, Command, MatchHost};
use crate::input::{Action, Key, View};
use crate::registry::SessionId;
use std::sync::Arc;
use tiktag_rules::{MoveOutcome, Slot};
use tracing::{debug, info, instrument};

/// What the transport should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Keep going; re-render if a notification arrives.
    Continue,
    /// The session picked another screen.
    SwitchView(View),
    /// Close the session.
    Quit,
}

#[derive(Debug, Clone)]
enum Identity {
    /// Network session; acts only for the seat the registry bound it to.
    Session(SessionId),
    /// One keyboard acting for whichever seat is due.
    HotSeat,
}

/// Input glue for one connection.
///
/// Bad input never surfaces as an error: unknown sessions, unmapped keys,
/// out-of-phase actions and out-of-turn moves are logged and dropped.
#[derive(Debug)]
pub struct SessionHandler {
    host: Arc<MatchHost>,
    identity: Identity,
    draft: String,
    view: View,
}

impl SessionHandler {
    /// Handler for a registered network session.
    pub fn new(host: Arc<MatchHost>, id: impl Into<SessionId>) -> Self {
        Self {
            host,
            identity: Identity::Session(id.into()),
            draft: String::new(),
            view: View::default(),
        }
    }

    /// Handler for a single local keyboard shared by both players.
    pub fn hot_seat(host: Arc<MatchHost>) -> Self {
        Self {
            host,
            identity: Identity::HotSeat,
            draft: String::new(),
            view: View::default(),
        }
    }

    /// Name typed so far.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Screen this session is looking at.
    pub fn view(&self) -> View {
        self.view
    }

    /// The host this handler submits to.
    pub fn host(&self) -> &Arc<MatchHost> {
        &self.host
    }

    /// Seat this handler acts for right now.
    pub fn slot(&self) -> Option<Slot> {
        match &self.identity {
            Identity::Session(id) => self.host.registry().slot_of(id),
            Identity::HotSeat => Some(self.host.acting_slot()),
        }
    }

    /// Handles one key.
    #[instrument(skip(self), fields(identity = ?self.identity))]
    pub fn handle(&mut self, key: Key) -> Reply {
        let phase = self.host.phase();
        let Some(action) = Action::from_key(key, phase) else {
            debug!(%phase, "Unmapped key");
            return Reply::Continue;
        };

        match action {
            Action::Quit => return Reply::Quit,
            Action::SwitchView(view) => {
                self.view = view;
                return Reply::SwitchView(view);
            }
            _ => {}
        }

        let Some(slot) = self.slot() else {
            debug!("Session holds no seat, ignoring input");
            return Reply::Continue;
        };

        match action {
            Action::Type(c) if self.is_naming(slot) => {
                if self.draft.chars().count() < self.host.name_limit() {
                    self.draft.push(c);
                }
            }
            Action::Erase if self.is_naming(slot) => {
                self.draft.pop();
            }
            Action::SubmitName if self.is_naming(slot) => {
                let name = std::mem::take(&mut self.draft);
                self.submit(Command::SubmitName(name));
            }
            Action::Move { row, col } => {
                self.submit(Command::Move { slot, row, col });
            }
            Action::Reset => {
                self.submit(Command::ResetRound);
            }
            _ => debug!(%slot, ?action, "Not this seat's prompt"),
        }
        Reply::Continue
    }

    fn is_naming(&self, slot: Slot) -> bool {
        self.host.naming_slot() == Some(slot)
    }

    fn submit(&self, command: Command) {
        match self.host.submit(command) {
            Ok(Applied::Moved(MoveOutcome::Ignored)) => debug!("Move out of turn ignored"),
            Ok(Applied::Moved(MoveOutcome::Won { line, winner })) => {
                info!(%line, %winner, "Round won")
            }
            Ok(applied) => debug!(?applied, "Command applied"),
            Err(e) => debug!(error = %e, "Command absorbed"),
        }
    }
}
