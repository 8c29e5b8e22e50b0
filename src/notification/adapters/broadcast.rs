//! Fan-out sink backed by a Tokio broadcast channel.
//!
//! Real-time delivery layers subscribe to the channel and route events to
//! their own rooms or connections. Slow subscribers lag and lose the oldest
//! events rather than slowing down the marketplace.

use crate::notification::{
    domain::DomainEvent,
    ports::{NotificationError, NotificationSink},
};
use async_trait::async_trait;
use std::num::NonZeroUsize;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Sink that publishes events to every current subscriber.
#[derive(Debug, Clone)]
pub struct BroadcastNotificationSink {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastNotificationSink {
    /// Creates a sink whose subscribers buffer up to `capacity` events.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        let (sender, _) = broadcast::channel(capacity.get());
        Self { sender }
    }

    /// Subscribes to events emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotificationSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl NotificationSink for BroadcastNotificationSink {
    async fn emit(&self, event: &DomainEvent) -> Result<(), NotificationError> {
        // No subscribers is a normal state; the event is simply not observed.
        if self.sender.send(event.clone()).is_err() {
            tracing::debug!(event = event.name(), "no notification subscribers");
        }
        Ok(())
    }
}
