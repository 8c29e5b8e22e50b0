//! Typed domain events.

use crate::{
    booking::domain::{BookingId, BookingStatus},
    identity::domain::UserId,
    money::Money,
    offer::domain::OfferId,
    task::domain::{TaskId, TaskStatus},
};
use serde::Serialize;

/// Event raised after a committed marketplace state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A provider submitted an offer on a task.
    OfferCreated {
        /// New offer.
        offer_id: OfferId,
        /// Task the offer targets.
        task_id: TaskId,
        /// Task owner, who should be told about the bid.
        client: UserId,
        /// Bidding provider.
        provider: UserId,
        /// Proposed price.
        proposed_price: Money,
    },
    /// The task owner declined an offer.
    OfferDeclined {
        /// Declined offer.
        offer_id: OfferId,
        /// Task the offer targeted.
        task_id: TaskId,
        /// Provider whose offer was declined.
        provider: UserId,
    },
    /// An offer was accepted and the task assigned.
    TaskAssigned {
        /// Assigned task.
        task_id: TaskId,
        /// Accepted offer.
        offer_id: OfferId,
        /// Task owner.
        client: UserId,
        /// Assigned provider.
        provider: UserId,
        /// Booking created by the acceptance.
        booking_id: BookingId,
    },
    /// A task moved along its status graph outside of assignment.
    TaskStatusChanged {
        /// Affected task.
        task_id: TaskId,
        /// Previous status.
        from: TaskStatus,
        /// New status.
        to: TaskStatus,
    },
    /// A booking was created, directly or by offer acceptance.
    BookingCreated {
        /// New booking.
        booking_id: BookingId,
        /// Booking customer.
        customer: UserId,
        /// Booked provider.
        provider: UserId,
        /// Price snapshot.
        total_price: Money,
    },
    /// A booking moved along its status graph.
    BookingStatusChanged {
        /// Affected booking.
        booking_id: BookingId,
        /// Previous status.
        from: BookingStatus,
        /// New status.
        to: BookingStatus,
    },
}

impl DomainEvent {
    /// Returns the dotted event name used by downstream subscribers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OfferCreated { .. } => "offer.created",
            Self::OfferDeclined { .. } => "offer.declined",
            Self::TaskAssigned { .. } => "task.assigned",
            Self::TaskStatusChanged { .. } => "task.status_changed",
            Self::BookingCreated { .. } => "booking.created",
            Self::BookingStatusChanged { .. } => "booking.status_changed",
        }
    }

    /// Returns the users the event concerns.
    #[must_use]
    pub fn recipients(&self) -> Vec<UserId> {
        match self {
            Self::OfferCreated { client, .. } => vec![*client],
            Self::OfferDeclined { provider, .. } => vec![*provider],
            Self::TaskAssigned {
                client, provider, ..
            } => vec![*client, *provider],
            Self::BookingCreated {
                customer, provider, ..
            } => vec![*customer, *provider],
            Self::TaskStatusChanged { .. } | Self::BookingStatusChanged { .. } => Vec::new(),
        }
    }

    /// Serializes the event body for transport.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be encoded.
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
