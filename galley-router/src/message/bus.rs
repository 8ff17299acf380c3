//! KDS publish/subscribe channel
//!
//! ```text
//! Dispatcher ──▶ publish(KdsEnvelope) ──▶ broadcast::Sender
//!                                              │
//!                     ┌────────────────────────┼──────────────────────┐
//!                     ▼                        ▼                      ▼
//!              KdsSubscriber             KdsSubscriber          KdsSubscriber
//!           (tags: kitchen)           (station: line-2)         (expo)
//! ```
//!
//! Topics are scoped by location, tag and station. Every subscriber sees the
//! broadcast stream and keeps only envelopes whose scope matches its
//! subscription. Each dispatched order also yields one order-wide envelope,
//! which only expo subscriptions receive.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::printing::KdsTicket;
use crate::routing::normalize_tags;

/// Default capacity of the broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("KDS channel is shut down")]
    Closed,
}

/// One published KDS ticket with its topic scope
#[derive(Debug, Clone)]
pub struct KdsEnvelope {
    pub location_id: String,
    pub tags: Vec<String>,
    /// Set when the ticket is addressed to one specific screen
    pub station_id: Option<String>,
    /// The full order for expo screens rather than one station's share
    pub order_wide: bool,
    pub ticket: KdsTicket,
}

impl KdsEnvelope {
    /// One station's ticket, scoped by its matched tags
    pub fn for_station(
        location_id: impl Into<String>,
        tags: Vec<String>,
        station_id: impl Into<String>,
        ticket: KdsTicket,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            tags,
            station_id: Some(station_id.into()),
            order_wide: false,
            ticket,
        }
    }

    /// Whole-order broadcast for expo screens
    pub fn for_order(location_id: impl Into<String>, ticket: KdsTicket) -> Self {
        Self {
            location_id: location_id.into(),
            tags: Vec::new(),
            station_id: None,
            order_wide: true,
            ticket,
        }
    }

    /// Topic strings this envelope is published under
    pub fn topics(&self) -> Vec<String> {
        if self.order_wide {
            return vec![format!("kds/{}/expo", self.location_id)];
        }
        let mut topics: Vec<String> = self
            .tags
            .iter()
            .map(|tag| format!("kds/{}/tag/{}", self.location_id, tag))
            .collect();
        if let Some(station_id) = &self.station_id {
            topics.push(format!("kds/{}/station/{}", self.location_id, station_id));
        }
        topics
    }
}

/// What a screen wants to receive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KdsSubscription {
    pub location_id: String,
    pub tags: Vec<String>,
    pub station_id: Option<String>,
    /// Expo screens receive the order-wide envelope of every order at their
    /// location
    pub expo: bool,
}

impl KdsSubscription {
    pub fn tags<I, S>(location_id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        Self {
            location_id: location_id.into(),
            tags: normalize_tags(&tags),
            ..Default::default()
        }
    }

    pub fn station(location_id: impl Into<String>, station_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            station_id: Some(station_id.into()),
            ..Default::default()
        }
    }

    pub fn expo(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            expo: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, envelope: &KdsEnvelope) -> bool {
        if envelope.location_id != self.location_id {
            return false;
        }
        if envelope.order_wide {
            return self.expo;
        }
        let station_match = matches!(
            (&self.station_id, &envelope.station_id),
            (Some(mine), Some(theirs)) if mine == theirs
        );
        station_match || envelope.tags.iter().any(|t| self.tags.contains(t))
    }
}

/// Broadcast channel feeding every KDS screen
///
/// Constructed once, injected where needed, and closed with [`shutdown`].
///
/// [`shutdown`]: KdsChannel::shutdown
#[derive(Debug, Clone)]
pub struct KdsChannel {
    tx: broadcast::Sender<Arc<KdsEnvelope>>,
    shutdown_token: CancellationToken,
}

impl KdsChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Fire-and-forget publish; returns how many receivers saw the envelope
    ///
    /// Having no connected screen is not an error.
    pub fn publish(&self, envelope: KdsEnvelope) -> Result<usize, ChannelError> {
        if self.shutdown_token.is_cancelled() {
            return Err(ChannelError::Closed);
        }
        let topics = envelope.topics();
        match self.tx.send(Arc::new(envelope)) {
            Ok(receivers) => {
                debug!(?topics, receivers, "KDS ticket published");
                Ok(receivers)
            }
            Err(_) => {
                debug!(?topics, "KDS ticket published with no subscribers");
                Ok(0)
            }
        }
    }

    pub fn subscribe(&self, subscription: KdsSubscription) -> KdsSubscriber {
        KdsSubscriber {
            rx: self.tx.subscribe(),
            subscription,
            shutdown_token: self.shutdown_token.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Close the channel; pending and future `recv` calls return `None`
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }
}

impl Default for KdsChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

/// Receiving end for one screen
#[derive(Debug)]
pub struct KdsSubscriber {
    rx: broadcast::Receiver<Arc<KdsEnvelope>>,
    subscription: KdsSubscription,
    shutdown_token: CancellationToken,
}

impl KdsSubscriber {
    pub fn subscription(&self) -> &KdsSubscription {
        &self.subscription
    }

    /// Next envelope matching this subscription, `None` once shut down
    pub async fn recv(&mut self) -> Option<Arc<KdsEnvelope>> {
        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => return None,
                msg = self.rx.recv() => match msg {
                    Ok(envelope) if self.subscription.matches(&envelope) => return Some(envelope),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "KDS subscriber lagged, tickets dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv)
    pub fn try_recv(&mut self) -> Option<Arc<KdsEnvelope>> {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) if self.subscription.matches(&envelope) => return Some(envelope),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "KDS subscriber lagged, tickets dropped");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}
