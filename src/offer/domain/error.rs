//! Error types for offer validation and decisions.

use super::{OfferId, OfferStatus};
use crate::validation::FieldError;
use thiserror::Error;

/// Errors returned by offer domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OfferDomainError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// The offer already left `sent`.
    #[error("offer {offer_id} was already {status}")]
    AlreadyDecided {
        /// Offer that rejected the decision.
        offer_id: OfferId,
        /// Current status.
        status: OfferStatus,
    },
}

/// Error returned while parsing offer statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown offer status: {0}")]
pub struct ParseOfferStatusError(pub String);
