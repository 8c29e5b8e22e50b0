//! Recording notification sink for tests.

use crate::notification::{
    domain::DomainEvent,
    ports::{NotificationError, NotificationSink},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Sink that keeps every emitted event in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl InMemoryNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all events received so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the names of all events received so far, oldest first.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(DomainEvent::name).collect()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn emit(&self, event: &DomainEvent) -> Result<(), NotificationError> {
        let mut events = self.events.lock().map_err(|err| {
            NotificationError::Delivery(Arc::new(std::io::Error::other(err.to_string())))
        })?;
        events.push(event.clone());
        Ok(())
    }
}
