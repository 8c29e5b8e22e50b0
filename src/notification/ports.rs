//! Notification sink port.

use super::domain::DomainEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Receives domain events for downstream delivery.
///
/// Implementations must not block on delivery; queue or drop instead.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Hands an event to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the sink rejects the event. Callers
    /// in the marketplace log and discard this error.
    async fn emit(&self, event: &DomainEvent) -> Result<(), NotificationError>;
}

/// Errors raised by notification sinks.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The sink is closed and accepts no more events.
    #[error("notification sink is closed")]
    Closed,

    /// Delivery infrastructure failed.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

/// Emits `event`, logging instead of propagating any sink failure.
pub async fn emit_best_effort(sink: &dyn NotificationSink, event: DomainEvent) {
    if let Err(err) = sink.emit(&event).await {
        tracing::warn!(event = event.name(), error = %err, "dropped notification");
    }
}
