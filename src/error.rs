//! Error taxonomy shared by every marketplace service.
//!
//! Each service defines its own error enum carrying the identifiers involved
//! in a failure. Callers that only need to decide how to react (render a
//! message, retry, map to a status code) use [`ErrorKind`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a failed marketplace operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced entity does not exist.
    NotFound,
    /// The actor lacks authority over the entity.
    Forbidden,
    /// A field failed validation.
    ValidationFailed,
    /// The task is no longer open.
    TaskNotOpen,
    /// The offer has already been accepted or declined.
    OfferAlreadyDecided,
    /// The provider already has an offer on the task.
    DuplicateOffer,
    /// The task owner tried to bid on their own task.
    SelfOfferForbidden,
    /// The requested status is not a legal successor of the current one.
    InvalidTransition,
    /// The operation lost a concurrency race; nothing was written.
    Conflict,
    /// No authenticated actor is available.
    Unauthenticated,
    /// The backing store failed.
    Unavailable,
}

impl ErrorKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::ValidationFailed => "validation_failed",
            Self::TaskNotOpen => "task_not_open",
            Self::OfferAlreadyDecided => "offer_already_decided",
            Self::DuplicateOffer => "duplicate_offer",
            Self::SelfOfferForbidden => "self_offer_forbidden",
            Self::InvalidTransition => "invalid_transition",
            Self::Conflict => "conflict",
            Self::Unauthenticated => "unauthenticated",
            Self::Unavailable => "unavailable",
        }
    }

    /// Returns whether repeating the same request may succeed.
    ///
    /// Only lost races and store outages qualify. Every other kind is a
    /// property of the request itself and will fail again.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Conflict | Self::Unavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
