//! In-memory assignment store over the in-memory repositories.

use async_trait::async_trait;

use crate::{
    assignment::{
        domain::Acceptance,
        ports::{AssignmentStore, AssignmentStoreResult},
    },
    booking::adapters::memory::InMemoryBookingRepository,
    offer::{adapters::memory::InMemoryOfferRepository, domain::OfferStatus},
    task::{adapters::memory::InMemoryTaskRepository, domain::TaskStatus},
};

/// Commits acceptances against shared in-memory repositories.
///
/// Write locks are taken in task, offer, booking order and held until all
/// three writes are applied, so readers never see a partial acceptance.
#[derive(Debug, Clone)]
pub struct InMemoryAssignmentStore {
    tasks: InMemoryTaskRepository,
    offers: InMemoryOfferRepository,
    bookings: InMemoryBookingRepository,
}

impl InMemoryAssignmentStore {
    /// Creates a store sharing state with the given repositories.
    #[must_use]
    pub fn new(
        tasks: &InMemoryTaskRepository,
        offers: &InMemoryOfferRepository,
        bookings: &InMemoryBookingRepository,
    ) -> Self {
        Self {
            tasks: tasks.clone(),
            offers: offers.clone(),
            bookings: bookings.clone(),
        }
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn commit(&self, acceptance: &Acceptance) -> AssignmentStoreResult<()> {
        let mut tasks = self.tasks.write_state()?;
        let mut offers = self.offers.write_state()?;
        let mut bookings = self.bookings.write_state()?;

        tasks.ensure_status(acceptance.task().id(), TaskStatus::Open)?;
        offers.ensure_status(acceptance.offer().id(), OfferStatus::Sent)?;
        bookings.ensure_insertable(acceptance.booking())?;

        tasks.write_status_if(acceptance.task(), TaskStatus::Open)?;
        offers.replace_if_status(acceptance.offer(), OfferStatus::Sent)?;
        bookings.insert_checked(acceptance.booking());
        Ok(())
    }
}
