//! Non-blocking fan-out of state-change notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, instrument, trace};

/// Tells a session the match changed; it re-pulls the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateChanged;

/// Sending half of one session's bounded notification channel.
#[derive(Debug, Clone)]
pub struct Mailbox {
    tx: mpsc::Sender<StateChanged>,
    dropped: Arc<AtomicU64>,
}

impl Mailbox {
    /// Creates a mailbox and the receiver the session polls.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<StateChanged>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let mailbox = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (mailbox, rx)
    }

    /// Notifications discarded because the channel was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// True once the receiver is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn offer(&self) -> Delivery {
        match self.tx.try_send(StateChanged) {
            Ok(()) => Delivery::Delivered,
            // A pending notification already covers this change.
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Delivery::Dropped
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Delivered,
    Dropped,
    Closed,
}

/// Tally of one fan-out pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    /// Mailboxes that accepted the notification.
    pub delivered: usize,
    /// Mailboxes that were full.
    pub dropped: usize,
    /// Mailboxes whose receiver had gone away.
    pub closed: usize,
}

/// Delivers [`StateChanged`] to a set of mailboxes without ever waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Broadcaster;

impl Broadcaster {
    /// Offers one notification to every mailbox.
    #[instrument(skip_all)]
    pub fn fan_out<'a>(&self, mailboxes: impl IntoIterator<Item = &'a Mailbox>) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for mailbox in mailboxes {
            match mailbox.offer() {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Dropped => {
                    trace!(total = mailbox.dropped(), "Mailbox full, notification dropped");
                    report.dropped += 1;
                }
                Delivery::Closed => report.closed += 1,
            }
        }
        debug!(
            delivered = report.delivered,
            dropped = report.dropped,
            closed = report.closed,
            "Broadcast complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mailbox_drops_and_counts() {
        let (mailbox, mut rx) = Mailbox::bounded(1);
        let report = Broadcaster.fan_out([&mailbox]);
        assert_eq!(report.delivered, 1);

        let report = Broadcaster.fan_out([&mailbox]);
        assert_eq!(report.dropped, 1);
        assert_eq!(mailbox.dropped(), 1);

        assert_eq!(rx.try_recv(), Ok(StateChanged));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_mailbox_reported() {
        let (mailbox, rx) = Mailbox::bounded(4);
        drop(rx);
        let report = Broadcaster.fan_out([&mailbox]);
        assert_eq!(report.closed, 1);
        assert!(mailbox.is_closed());
    }

    #[test]
    fn test_zero_capacity_raised() {
        let (mailbox, mut rx) = Mailbox::bounded(0);
        assert_eq!(Broadcaster.fan_out([&mailbox]).delivered, 1);
        assert_eq!(rx.try_recv(), Ok(StateChanged));
    }
}
