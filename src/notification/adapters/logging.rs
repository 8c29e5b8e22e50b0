//! Sink that writes events to the tracing log.

use crate::notification::{
    domain::DomainEvent,
    ports::{NotificationError, NotificationSink},
};
use async_trait::async_trait;

/// Sink that logs each event at `info` level and delivers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn emit(&self, event: &DomainEvent) -> Result<(), NotificationError> {
        let payload = event
            .payload()
            .map_err(|err| NotificationError::Delivery(std::sync::Arc::new(err)))?;
        tracing::info!(event = event.name(), %payload, "domain event");
        Ok(())
    }
}
