//! Failover coordination
//!
//! After a printer fails, the dispatcher waits a station-specific window for
//! an operator to ask for a retry. A signal inside the window means "try the
//! same printer again"; silence means "send it to the backup".

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Outcome of a failover window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailoverDecision {
    RetryPrimary,
    UseBackup,
}

/// Retry signal shared by every delivery waiting on one station
#[derive(Debug, Default)]
struct RetrySignal {
    notify: Arc<Notify>,
    waiters: usize,
}

/// Operator retry signals, keyed by station id
#[derive(Debug, Default)]
pub struct FailoverCoordinator {
    waiting: DashMap<String, RetrySignal>,
}

/// Leaves the station's waiter set on drop, including when the wait is
/// cancelled
struct Registration<'a> {
    coordinator: &'a FailoverCoordinator,
    station_id: &'a str,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.coordinator.leave(self.station_id);
    }
}

impl FailoverCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for an immediate retry of a failed station
    ///
    /// Returns false when no delivery is currently waiting on that station.
    pub fn signal_retry(&self, station_id: &str) -> bool {
        match self.waiting.get(station_id) {
            Some(signal) => {
                info!(station_id, waiters = signal.waiters, "Operator retry signalled");
                signal.notify.notify_waiters();
                true
            }
            None => {
                debug!(station_id, "Retry signal with nobody waiting");
                false
            }
        }
    }

    pub fn is_waiting(&self, station_id: &str) -> bool {
        self.waiting.contains_key(station_id)
    }

    /// Wait up to `window` for a retry signal on `station_id`
    pub async fn wait_for_retry(&self, station_id: &str, window: Duration) -> FailoverDecision {
        let notify;
        let mut notified;
        {
            let mut entry = self.waiting.entry(station_id.to_string()).or_default();
            entry.waiters += 1;
            notify = Arc::clone(&entry.notify);
            notified = Box::pin(notify.notified());
            // Enabled while the shard is still locked, so a signal cannot
            // slip in between
            notified.as_mut().enable();
        }
        let _registration = Registration {
            coordinator: self,
            station_id,
        };

        let decision = match tokio::time::timeout(window, notified).await {
            Ok(()) => FailoverDecision::RetryPrimary,
            Err(_) => FailoverDecision::UseBackup,
        };

        debug!(station_id, ?decision, "Failover window closed");
        decision
    }

    /// Drop one waiter; the last one out removes the entry
    fn leave(&self, station_id: &str) {
        if let Entry::Occupied(mut entry) = self.waiting.entry(station_id.to_string()) {
            let signal = entry.get_mut();
            signal.waiters = signal.waiters.saturating_sub(1);
            if signal.waiters == 0 {
                entry.remove();
            }
        }
    }
}
