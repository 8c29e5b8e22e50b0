//! The three post-images written by one offer acceptance.

use super::AssignmentDomainError;
use crate::{
    booking::domain::{Booking, BookingOrigin, NewBooking},
    offer::domain::Offer,
    task::domain::Task,
};
use mockable::Clock;

/// Assigned task, accepted offer and new booking, committed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Acceptance {
    task: Task,
    offer: Offer,
    booking: Booking,
}

impl Acceptance {
    /// Applies the acceptance to an open task and a sent offer.
    ///
    /// The task is assigned to the offer's provider, the offer is marked
    /// accepted, and a confirmed booking is priced at the offer's proposed
    /// price rather than the task budget.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentDomainError::OfferTaskMismatch`] when the offer
    /// targets another task, or the first aggregate rule that refuses the
    /// change.
    pub fn prepare(
        mut task: Task,
        mut offer: Offer,
        clock: &impl Clock,
    ) -> Result<Self, AssignmentDomainError> {
        if offer.task_id() != task.id() {
            return Err(AssignmentDomainError::OfferTaskMismatch {
                offer_id: offer.id(),
                task_id: task.id(),
            });
        }
        task.assign(offer.provider(), clock)?;
        offer.accept(clock)?;
        let booking = Booking::new(
            NewBooking {
                origin: BookingOrigin::Task(task.id()),
                customer: task.client(),
                provider: offer.provider(),
                total_price: offer.terms().proposed_price(),
                scheduled_at: task.details().scheduled_at,
                notes: None,
            },
            clock,
        )?;
        Ok(Self {
            task,
            offer,
            booking,
        })
    }

    /// Returns the assigned task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the accepted offer.
    #[must_use]
    pub const fn offer(&self) -> &Offer {
        &self.offer
    }

    /// Returns the booking created by the acceptance.
    #[must_use]
    pub const fn booking(&self) -> &Booking {
        &self.booking
    }
}
