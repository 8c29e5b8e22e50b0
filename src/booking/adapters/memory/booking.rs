//! In-memory repository for bookings.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    booking::{
        domain::{Booking, BookingId, BookingStatus, PaymentStatus},
        ports::{BookingRepository, BookingRepositoryError, BookingRepositoryResult},
    },
    identity::domain::UserId,
    task::domain::TaskId,
};

/// Thread-safe in-memory booking repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    state: Arc<RwLock<InMemoryBookingState>>,
}

/// Lock-protected booking table with its unique task index.
#[derive(Debug, Default)]
pub(crate) struct InMemoryBookingState {
    bookings: HashMap<BookingId, Booking>,
    by_task: HashMap<TaskId, BookingId>,
}

impl InMemoryBookingState {
    /// Fails if `booking` would violate an identifier or task uniqueness
    /// constraint.
    pub(crate) fn ensure_insertable(&self, booking: &Booking) -> BookingRepositoryResult<()> {
        if self.bookings.contains_key(&booking.id()) {
            return Err(BookingRepositoryError::DuplicateId(booking.id()));
        }
        if let Some(task_id) = booking
            .origin()
            .task_id()
            .filter(|task_id| self.by_task.contains_key(task_id))
        {
            return Err(BookingRepositoryError::DuplicateTaskBooking(task_id));
        }
        Ok(())
    }

    /// Inserts a booking previously checked with
    /// [`Self::ensure_insertable`].
    pub(crate) fn insert_checked(&mut self, booking: &Booking) {
        if let Some(task_id) = booking.origin().task_id() {
            self.by_task.insert(task_id, booking.id());
        }
        self.bookings.insert(booking.id(), booking.clone());
    }

    fn stored_mut(&mut self, id: BookingId) -> BookingRepositoryResult<&mut Booking> {
        self.bookings
            .get_mut(&id)
            .ok_or(BookingRepositoryError::NotFound(id))
    }

    fn newest_first<'a>(bookings: impl Iterator<Item = &'a Booking>) -> Vec<Booking> {
        let mut collected: Vec<Booking> = bookings.cloned().collect();
        collected.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        collected
    }
}

impl InMemoryBookingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> BookingRepositoryResult<RwLockReadGuard<'_, InMemoryBookingState>> {
        self.state.read().map_err(|err| {
            BookingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Acquires the write lock; shared with the in-memory assignment store.
    pub(crate) fn write_state(
        &self,
    ) -> BookingRepositoryResult<RwLockWriteGuard<'_, InMemoryBookingState>> {
        self.state.write().map_err(|err| {
            BookingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn store(&self, booking: &Booking) -> BookingRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.ensure_insertable(booking)?;
        state.insert_checked(booking);
        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> BookingRepositoryResult<Option<Booking>> {
        let state = self.read_state()?;
        Ok(state.bookings.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> BookingRepositoryResult<Option<Booking>> {
        let state = self.read_state()?;
        Ok(state
            .by_task
            .get(&task_id)
            .and_then(|id| state.bookings.get(id))
            .cloned())
    }

    async fn list_for_customer(&self, customer: UserId) -> BookingRepositoryResult<Vec<Booking>> {
        let state = self.read_state()?;
        Ok(InMemoryBookingState::newest_first(
            state
                .bookings
                .values()
                .filter(|booking| booking.customer() == customer),
        ))
    }

    async fn list_for_provider(&self, provider: UserId) -> BookingRepositoryResult<Vec<Booking>> {
        let state = self.read_state()?;
        Ok(InMemoryBookingState::newest_first(
            state
                .bookings
                .values()
                .filter(|booking| booking.provider() == provider),
        ))
    }

    async fn update_if_status(
        &self,
        booking: &Booking,
        expected: BookingStatus,
    ) -> BookingRepositoryResult<()> {
        let mut state = self.write_state()?;
        let stored = state.stored_mut(booking.id())?;
        if stored.status() != expected {
            return Err(BookingRepositoryError::StatusConflict {
                booking_id: booking.id(),
                expected,
                actual: stored.status(),
            });
        }
        stored.adopt_status(booking);
        Ok(())
    }

    async fn update_payment_if(
        &self,
        booking: &Booking,
        expected: PaymentStatus,
    ) -> BookingRepositoryResult<()> {
        let mut state = self.write_state()?;
        let stored = state.stored_mut(booking.id())?;
        if stored.payment_status() != expected {
            return Err(BookingRepositoryError::PaymentConflict {
                booking_id: booking.id(),
                expected,
                actual: stored.payment_status(),
            });
        }
        stored.adopt_payment(booking);
        Ok(())
    }
}
