//! Offer aggregate.

use super::{OfferDomainError, OfferId, OfferStatus};
use crate::{
    config::OfferLimits,
    identity::domain::UserId,
    money::Money,
    task::domain::TaskId,
    validation::{bounded_text, minimum_amount, optional_text},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Validated content of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    message: String,
    proposed_price: Money,
    proposed_time_window: Option<String>,
}

impl OfferTerms {
    /// Validates raw offer content against `limits`.
    ///
    /// The message and time window are trimmed; a blank time window is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::Validation`] naming the first field out of
    /// bounds.
    pub fn new(
        message: &str,
        proposed_price: Decimal,
        proposed_time_window: Option<&str>,
        limits: &OfferLimits,
    ) -> Result<Self, OfferDomainError> {
        Ok(Self {
            message: bounded_text("message", message, limits.message)?,
            proposed_price: minimum_amount("proposed_price", proposed_price, limits.min_price)?,
            proposed_time_window: optional_text(
                "proposed_time_window",
                proposed_time_window,
                limits.max_time_window_chars,
            )?,
        })
    }

    /// Reassembles terms that were validated before being persisted.
    #[must_use]
    pub const fn from_persisted(
        message: String,
        proposed_price: Money,
        proposed_time_window: Option<String>,
    ) -> Self {
        Self {
            message,
            proposed_price,
            proposed_time_window,
        }
    }

    /// Returns the message to the task owner.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the proposed price.
    #[must_use]
    pub const fn proposed_price(&self) -> Money {
        self.proposed_price
    }

    /// Returns the proposed time window.
    #[must_use]
    pub fn proposed_time_window(&self) -> Option<&str> {
        self.proposed_time_window.as_deref()
    }
}

/// A provider's bid against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    task_id: TaskId,
    provider: UserId,
    terms: OfferTerms,
    status: OfferStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOfferData {
    /// Persisted offer identifier.
    pub id: OfferId,
    /// Persisted task reference.
    pub task_id: TaskId,
    /// Persisted author.
    pub provider: UserId,
    /// Persisted content.
    pub terms: OfferTerms,
    /// Persisted status.
    pub status: OfferStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// Creates a sent offer.
    #[must_use]
    pub fn new(task_id: TaskId, provider: UserId, terms: OfferTerms, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: OfferId::new(),
            task_id,
            provider,
            terms,
            status: OfferStatus::Sent,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an offer from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOfferData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            provider: data.provider,
            terms: data.terms,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the offer identifier.
    #[must_use]
    pub const fn id(&self) -> OfferId {
        self.id
    }

    /// Returns the task the offer targets.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the bidding provider.
    #[must_use]
    pub const fn provider(&self) -> UserId {
        self.provider
    }

    /// Returns the offer content.
    #[must_use]
    pub const fn terms(&self) -> &OfferTerms {
        &self.terms
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> OfferStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the offer accepted.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::AlreadyDecided`] unless the offer is sent.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), OfferDomainError> {
        self.decide(OfferStatus::Accepted, clock)
    }

    /// Marks the offer declined.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::AlreadyDecided`] unless the offer is sent.
    pub fn decline(&mut self, clock: &impl Clock) -> Result<(), OfferDomainError> {
        self.decide(OfferStatus::Declined, clock)
    }

    fn decide(&mut self, decision: OfferStatus, clock: &impl Clock) -> Result<(), OfferDomainError> {
        if self.status != OfferStatus::Sent {
            return Err(OfferDomainError::AlreadyDecided {
                offer_id: self.id,
                status: self.status,
            });
        }
        self.status = decision;
        self.updated_at = clock.utc();
        Ok(())
    }
}
