//! Which network session holds which seat, and where to notify it.

use crate::broadcast::{BroadcastReport, Broadcaster, Mailbox, StateChanged};
use derive_more::{Display, Error};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use strum::IntoEnumIterator;
use tiktag_rules::{Player, Slot};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a connected session.
pub type SessionId = String;

/// Error returned when a session cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    /// Both seats are held by connected sessions.
    #[display("Match is full: both seats are taken")]
    SlotUnavailable,

    /// A session with this id is already registered.
    #[display("Session {} is already registered", _0)]
    DuplicateSession(#[error(not(source))] SessionId),
}

/// What a newly registered session receives.
#[derive(Debug)]
pub struct Registration {
    /// Seat bound to the session.
    pub slot: Slot,
    /// Notifications for the session's render loop.
    pub notifications: mpsc::Receiver<StateChanged>,
}

#[derive(Debug)]
struct Entry {
    mailbox: Mailbox,
    slot: Slot,
}

#[derive(Debug, Default)]
struct Members {
    sessions: HashMap<SessionId, Entry>,
    seats: [Option<SessionId>; 2],
}

/// Maps sessions to seats and owns their notification mailboxes.
///
/// Membership changes and broadcast iteration share one lock that covers
/// only this map, never the match itself.
#[derive(Debug)]
pub struct SessionRegistry {
    members: Mutex<Members>,
    capacity: usize,
    release_on_disconnect: bool,
    broadcaster: Broadcaster,
}

impl SessionRegistry {
    /// Creates a registry whose mailboxes hold `capacity` notifications.
    #[instrument]
    pub fn new(capacity: usize, release_on_disconnect: bool) -> Self {
        info!("Creating session registry");
        Self {
            members: Mutex::new(Members::default()),
            capacity: capacity.max(1),
            release_on_disconnect,
            broadcaster: Broadcaster,
        }
    }

    /// Registers `id`, binding it to the first free seat (A, then B).
    #[instrument(skip(self))]
    pub fn register(&self, id: &str) -> Result<Registration, RegistryError> {
        let mut members = self.lock();

        if members.sessions.contains_key(id) {
            warn!("Session already registered");
            return Err(RegistryError::DuplicateSession(id.to_string()));
        }

        let slot = Player::iter()
            .find(|p| members.seats[p.index()].is_none())
            .ok_or_else(|| {
                warn!("Both seats taken, refusing session");
                RegistryError::SlotUnavailable
            })?;

        let (mailbox, notifications) = Mailbox::bounded(self.capacity);
        members.seats[slot.index()] = Some(id.to_string());
        members
            .sessions
            .insert(id.to_string(), Entry { mailbox, slot });

        info!(%slot, sessions = members.sessions.len(), "Session registered");
        Ok(Registration {
            slot,
            notifications,
        })
    }

    /// Removes `id` and returns the seat it held.
    ///
    /// The seat is released for a later session when the registry was built
    /// with `release_on_disconnect`; otherwise it stays reserved.
    #[instrument(skip(self))]
    pub fn unregister(&self, id: &str) -> Option<Slot> {
        let mut members = self.lock();
        let entry = members.sessions.remove(id)?;
        if self.release_on_disconnect {
            members.seats[entry.slot.index()] = None;
        }
        info!(
            slot = %entry.slot,
            released = self.release_on_disconnect,
            sessions = members.sessions.len(),
            "Session unregistered"
        );
        Some(entry.slot)
    }

    /// Seat held by `id`, if it is registered.
    pub fn slot_of(&self, id: &str) -> Option<Slot> {
        self.lock().sessions.get(id).map(|e| e.slot)
    }

    /// Session currently holding `slot`.
    pub fn holder_of(&self, slot: Slot) -> Option<SessionId> {
        self.lock().seats[slot.index()].clone()
    }

    /// Number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Notifications dropped for `id` because its mailbox was full.
    pub fn dropped_for(&self, id: &str) -> Option<u64> {
        self.lock().sessions.get(id).map(|e| e.mailbox.dropped())
    }

    /// Offers a [`StateChanged`] to every registered session.
    ///
    /// Never waits on a recipient: a full mailbox loses this notification.
    #[instrument(skip(self))]
    pub fn broadcast(&self) -> BroadcastReport {
        let members = self.lock();
        let report = self
            .broadcaster
            .fan_out(members.sessions.values().map(|e| &e.mailbox));
        debug!(recipients = members.sessions.len(), "Fanned out state change");
        report
    }

    fn lock(&self) -> MutexGuard<'_, Members> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_seat_survives_disconnect() {
        let registry = SessionRegistry::new(1, false);
        registry.register("a").unwrap();
        registry.register("b").unwrap();
        assert_eq!(registry.unregister("a"), Some(Player::A));
        assert_eq!(
            registry.register("c").unwrap_err(),
            RegistryError::SlotUnavailable
        );
        assert_eq!(registry.holder_of(Player::A).as_deref(), Some("a"));
    }

    #[test]
    fn test_released_seat_is_reused() {
        let registry = SessionRegistry::new(1, true);
        registry.register("a").unwrap();
        registry.register("b").unwrap();
        registry.unregister("a");
        let reg = registry.register("c").unwrap();
        assert_eq!(reg.slot, Player::A);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = SessionRegistry::new(1, true);
        registry.register("a").unwrap();
        assert_eq!(
            registry.register("a").unwrap_err(),
            RegistryError::DuplicateSession("a".to_string())
        );
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn test_unknown_unregister_is_none() {
        let registry = SessionRegistry::new(1, true);
        assert_eq!(registry.unregister("ghost"), None);
    }
}
