//! Unit-of-work port for offer acceptance.

use crate::{
    assignment::domain::Acceptance, booking::ports::BookingRepositoryError,
    offer::ports::OfferRepositoryError, task::ports::TaskRepositoryError,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for assignment store operations.
pub type AssignmentStoreResult<T> = Result<T, AssignmentStoreError>;

/// Commits an [`Acceptance`] atomically.
///
/// The task write is conditional on the stored status still being `open`
/// and is applied first; the offer write is conditional on `sent`; the
/// booking insert relies on the unique task index. When any step fails
/// nothing is written.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Writes the assigned task, the accepted offer and the new booking.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentStoreError::Task`] with a status conflict when
    /// another acceptance assigned the task first,
    /// [`AssignmentStoreError::Offer`] when the offer was decided
    /// concurrently, or [`AssignmentStoreError::Booking`] when the task
    /// already has a booking.
    async fn commit(&self, acceptance: &Acceptance) -> AssignmentStoreResult<()>;
}

/// Errors returned by assignment store implementations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentStoreError {
    /// The conditional task write failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),

    /// The conditional offer write failed.
    #[error(transparent)]
    Offer(#[from] OfferRepositoryError),

    /// The booking insert failed.
    #[error(transparent)]
    Booking(#[from] BookingRepositoryError),

    /// Transaction-level failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssignmentStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
