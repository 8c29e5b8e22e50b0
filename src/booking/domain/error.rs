//! Error types for booking validation and lifecycle.

use super::{BookingId, BookingStatus};
use crate::{identity::domain::UserId, validation::FieldError};
use thiserror::Error;

/// Errors returned by booking domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingDomainError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// Customer and provider are the same user.
    #[error("user {0} cannot book themselves")]
    SameParty(UserId),

    /// The requested status is not a successor of the current one.
    #[error("invalid booking transition for {booking_id}: {from} -> {to}")]
    InvalidTransition {
        /// Booking whose transition was rejected.
        booking_id: BookingId,
        /// Status at the time of the request.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },

    /// A paid booking cannot become unpaid.
    #[error("booking {0} is already paid")]
    PaymentRegression(BookingId),
}

/// Error returned while parsing booking or payment statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown booking status: {0}")]
pub struct ParseBookingStatusError(pub String);
