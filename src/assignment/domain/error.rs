//! Errors raised while building an acceptance.

use crate::{
    booking::domain::BookingDomainError,
    offer::domain::{OfferDomainError, OfferId},
    task::domain::{TaskDomainError, TaskId},
};
use thiserror::Error;

/// Errors returned while deriving the post-acceptance aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignmentDomainError {
    /// The offer targets a different task.
    #[error("offer {offer_id} does not belong to task {task_id}")]
    OfferTaskMismatch {
        /// Offer being accepted.
        offer_id: OfferId,
        /// Task named by the caller.
        task_id: TaskId,
    },

    /// The task refused the assignment.
    #[error(transparent)]
    Task(#[from] TaskDomainError),

    /// The offer refused the decision.
    #[error(transparent)]
    Offer(#[from] OfferDomainError),

    /// The booking could not be created.
    #[error(transparent)]
    Booking(#[from] BookingDomainError),
}
