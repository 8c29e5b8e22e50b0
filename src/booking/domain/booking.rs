//! Booking aggregate.

use super::{BookingDomainError, BookingId, BookingOrigin, BookingStatus, PaymentStatus};
use crate::{
    identity::domain::UserId,
    lifecycle::{StatusGraph, check_transition},
    money::Money,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Listing or task the booking came from.
    pub origin: BookingOrigin,
    /// Paying party.
    pub customer: UserId,
    /// Party doing the work.
    pub provider: UserId,
    /// Price snapshot at creation time.
    pub total_price: Money,
    /// Agreed start, if any.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Customer note, already trimmed and bounded.
    pub notes: Option<String>,
}

/// A confirmed, payable engagement between a customer and a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    origin: BookingOrigin,
    customer: UserId,
    provider: UserId,
    total_price: Money,
    status: BookingStatus,
    payment_status: PaymentStatus,
    scheduled_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBookingData {
    /// Persisted booking identifier.
    pub id: BookingId,
    /// Persisted origin.
    pub origin: BookingOrigin,
    /// Persisted customer.
    pub customer: UserId,
    /// Persisted provider.
    pub provider: UserId,
    /// Persisted price snapshot.
    pub total_price: Money,
    /// Persisted lifecycle status.
    pub status: BookingStatus,
    /// Persisted payment status.
    pub payment_status: PaymentStatus,
    /// Persisted schedule.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Persisted note.
    pub notes: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates an unpaid booking.
    ///
    /// Task-origin bookings start `confirmed` since both parties already
    /// agreed through the offer; direct bookings start `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::SameParty`] when customer and provider
    /// are the same user.
    pub fn new(data: NewBooking, clock: &impl Clock) -> Result<Self, BookingDomainError> {
        if data.customer == data.provider {
            return Err(BookingDomainError::SameParty(data.customer));
        }
        let status = match data.origin {
            BookingOrigin::Task(_) => BookingStatus::Confirmed,
            BookingOrigin::Service(_) => BookingStatus::Pending,
        };
        let timestamp = clock.utc();
        Ok(Self {
            id: BookingId::new(),
            origin: data.origin,
            customer: data.customer,
            provider: data.provider,
            total_price: data.total_price,
            status,
            payment_status: PaymentStatus::Unpaid,
            scheduled_at: data.scheduled_at,
            notes: data.notes,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a booking from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBookingData) -> Self {
        Self {
            id: data.id,
            origin: data.origin,
            customer: data.customer,
            provider: data.provider,
            total_price: data.total_price,
            status: data.status,
            payment_status: data.payment_status,
            scheduled_at: data.scheduled_at,
            notes: data.notes,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the booking identifier.
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// Returns where the booking came from.
    #[must_use]
    pub const fn origin(&self) -> BookingOrigin {
        self.origin
    }

    /// Returns the paying party.
    #[must_use]
    pub const fn customer(&self) -> UserId {
        self.customer
    }

    /// Returns the party doing the work.
    #[must_use]
    pub const fn provider(&self) -> UserId {
        self.provider
    }

    /// Returns the price fixed at creation.
    #[must_use]
    pub const fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Returns the agreed start.
    #[must_use]
    pub const fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    /// Returns the customer note.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
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

    /// Returns whether `user` is the customer or the provider.
    #[must_use]
    pub fn is_party(&self, user: UserId) -> bool {
        self.customer == user || self.provider == user
    }

    /// Moves the booking along its status graph.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::InvalidTransition`] when `target` is not
    /// a successor of the current status.
    pub fn transition_to(
        &mut self,
        target: BookingStatus,
        clock: &impl Clock,
    ) -> Result<(), BookingDomainError> {
        check_transition(self.status, target).map_err(|_| {
            BookingDomainError::InvalidTransition {
                booking_id: self.id,
                from: self.status,
                to: target,
            }
        })?;
        self.status = target;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns whether the booking reached a terminal status.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    /// Records a payment status reported by the payment collaborator.
    ///
    /// Returns `false` when the booking already had `status`, in which case
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::PaymentRegression`] for paid to unpaid.
    pub fn set_payment_status(
        &mut self,
        status: PaymentStatus,
        clock: &impl Clock,
    ) -> Result<bool, BookingDomainError> {
        match (self.payment_status, status) {
            (current, requested) if current == requested => Ok(false),
            (PaymentStatus::Paid, PaymentStatus::Unpaid) => {
                Err(BookingDomainError::PaymentRegression(self.id))
            }
            _ => {
                self.payment_status = status;
                self.updated_at = clock.utc();
                Ok(true)
            }
        }
    }

    /// Copies the lifecycle status from `source`, leaving payment untouched.
    pub(crate) const fn adopt_status(&mut self, source: &Self) {
        self.status = source.status;
        self.updated_at = source.updated_at;
    }

    /// Copies the payment status from `source`, leaving the lifecycle
    /// untouched.
    pub(crate) const fn adopt_payment(&mut self, source: &Self) {
        self.payment_status = source.payment_status;
        self.updated_at = source.updated_at;
    }
}
