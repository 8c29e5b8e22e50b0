//! In-memory repository for offers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    identity::domain::UserId,
    offer::{
        domain::{Offer, OfferId, OfferStatus},
        ports::{OfferRepository, OfferRepositoryError, OfferRepositoryResult},
    },
    task::domain::TaskId,
};

/// Thread-safe in-memory offer repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOfferRepository {
    state: Arc<RwLock<InMemoryOfferState>>,
}

/// Lock-protected offer table with its `(task, provider)` unique index.
#[derive(Debug, Default)]
pub(crate) struct InMemoryOfferState {
    offers: HashMap<OfferId, Offer>,
    by_task_provider: HashMap<(TaskId, UserId), OfferId>,
}

impl InMemoryOfferState {
    /// Fails unless the stored offer exists and has status `expected`.
    pub(crate) fn ensure_status(
        &self,
        id: OfferId,
        expected: OfferStatus,
    ) -> OfferRepositoryResult<()> {
        let stored = self.offers.get(&id).ok_or(OfferRepositoryError::NotFound(id))?;
        if stored.status() != expected {
            return Err(OfferRepositoryError::StatusConflict {
                offer_id: id,
                expected,
                actual: stored.status(),
            });
        }
        Ok(())
    }

    /// Replaces the stored offer if its status is still `expected`.
    pub(crate) fn replace_if_status(
        &mut self,
        offer: &Offer,
        expected: OfferStatus,
    ) -> OfferRepositoryResult<()> {
        self.ensure_status(offer.id(), expected)?;
        self.offers.insert(offer.id(), offer.clone());
        Ok(())
    }

    fn newest_first<'a>(offers: impl Iterator<Item = &'a Offer>) -> Vec<Offer> {
        let mut collected: Vec<Offer> = offers.cloned().collect();
        collected.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        collected
    }
}

impl InMemoryOfferRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> OfferRepositoryResult<RwLockReadGuard<'_, InMemoryOfferState>> {
        self.state.read().map_err(|err| {
            OfferRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Acquires the write lock; shared with the in-memory assignment store.
    pub(crate) fn write_state(
        &self,
    ) -> OfferRepositoryResult<RwLockWriteGuard<'_, InMemoryOfferState>> {
        self.state.write().map_err(|err| {
            OfferRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn insert(&self, offer: &Offer) -> OfferRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.offers.contains_key(&offer.id()) {
            return Err(OfferRepositoryError::DuplicateId(offer.id()));
        }
        let key = (offer.task_id(), offer.provider());
        if state.by_task_provider.contains_key(&key) {
            return Err(OfferRepositoryError::DuplicateOffer {
                task_id: offer.task_id(),
                provider: offer.provider(),
            });
        }
        state.by_task_provider.insert(key, offer.id());
        state.offers.insert(offer.id(), offer.clone());
        Ok(())
    }

    async fn update_if_status(
        &self,
        offer: &Offer,
        expected: OfferStatus,
    ) -> OfferRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.replace_if_status(offer, expected)
    }

    async fn find_by_id(&self, id: OfferId) -> OfferRepositoryResult<Option<Offer>> {
        let state = self.read_state()?;
        Ok(state.offers.get(&id).cloned())
    }

    async fn find_by_task_and_provider(
        &self,
        task_id: TaskId,
        provider: UserId,
    ) -> OfferRepositoryResult<Option<Offer>> {
        let state = self.read_state()?;
        Ok(state
            .by_task_provider
            .get(&(task_id, provider))
            .and_then(|id| state.offers.get(id))
            .cloned())
    }

    async fn list_by_task(&self, task_id: TaskId) -> OfferRepositoryResult<Vec<Offer>> {
        let state = self.read_state()?;
        Ok(InMemoryOfferState::newest_first(
            state.offers.values().filter(|offer| offer.task_id() == task_id),
        ))
    }

    async fn list_by_provider(&self, provider: UserId) -> OfferRepositoryResult<Vec<Offer>> {
        let state = self.read_state()?;
        Ok(InMemoryOfferState::newest_first(
            state
                .offers
                .values()
                .filter(|offer| offer.provider() == provider),
        ))
    }

    async fn count_by_task(&self, task_id: TaskId) -> OfferRepositoryResult<u32> {
        let state = self.read_state()?;
        let count = state
            .offers
            .values()
            .filter(|offer| offer.task_id() == task_id)
            .count();
        u32::try_from(count).map_err(OfferRepositoryError::persistence)
    }
}
