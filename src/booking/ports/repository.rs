//! Repository port for bookings.

use crate::{
    booking::domain::{Booking, BookingId, BookingStatus, PaymentStatus},
    identity::domain::UserId,
    task::domain::TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for booking repository operations.
pub type BookingRepositoryResult<T> = Result<T, BookingRepositoryError>;

/// Booking persistence contract.
///
/// Bookings are never deleted. A task yields at most one booking, which
/// implementations enforce at the store.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a new booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::DuplicateTaskBooking`] when the
    /// originating task already has a booking.
    async fn store(&self, booking: &Booking) -> BookingRepositoryResult<()>;

    /// Finds a booking by identifier.
    async fn find_by_id(&self, id: BookingId) -> BookingRepositoryResult<Option<Booking>>;

    /// Finds the booking created from a task, if any.
    async fn find_by_task(&self, task_id: TaskId) -> BookingRepositoryResult<Option<Booking>>;

    /// Lists bookings where `customer` pays, newest first.
    async fn list_for_customer(&self, customer: UserId) -> BookingRepositoryResult<Vec<Booking>>;

    /// Lists bookings where `provider` works, newest first.
    async fn list_for_provider(&self, provider: UserId) -> BookingRepositoryResult<Vec<Booking>>;

    /// Persists the lifecycle status of `booking` if the stored status still
    /// equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::StatusConflict`] when another writer
    /// moved the booking first.
    async fn update_if_status(
        &self,
        booking: &Booking,
        expected: BookingStatus,
    ) -> BookingRepositoryResult<()>;

    /// Persists the payment status of `booking` if the stored payment status
    /// still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::PaymentConflict`] when another writer
    /// recorded a payment first.
    async fn update_payment_if(
        &self,
        booking: &Booking,
        expected: PaymentStatus,
    ) -> BookingRepositoryResult<()>;
}

/// Errors returned by booking repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BookingRepositoryError {
    /// The task already produced a booking.
    #[error("task {0} already has a booking")]
    DuplicateTaskBooking(TaskId),

    /// A booking with the same identifier already exists.
    #[error("duplicate booking identifier: {0}")]
    DuplicateId(BookingId),

    /// The booking was not found.
    #[error("booking not found: {0}")]
    NotFound(BookingId),

    /// The conditional status write lost against another writer.
    #[error("booking {booking_id} status is {actual}, expected {expected}")]
    StatusConflict {
        /// Booking whose write was rejected.
        booking_id: BookingId,
        /// Status the writer expected.
        expected: BookingStatus,
        /// Status found at write time.
        actual: BookingStatus,
    },

    /// The conditional payment write lost against another writer.
    #[error("booking {booking_id} payment is {actual}, expected {expected}")]
    PaymentConflict {
        /// Booking whose write was rejected.
        booking_id: BookingId,
        /// Payment status the writer expected.
        expected: PaymentStatus,
        /// Payment status found at write time.
        actual: PaymentStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BookingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
