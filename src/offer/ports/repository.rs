//! Repository port for offers.

use crate::{
    identity::domain::UserId,
    offer::domain::{Offer, OfferId, OfferStatus},
    task::domain::TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for offer repository operations.
pub type OfferRepositoryResult<T> = Result<T, OfferRepositoryError>;

/// Offer persistence contract.
///
/// Implementations enforce one offer per task and provider at the store, so
/// two concurrent submissions cannot both be inserted.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Inserts a new offer.
    ///
    /// # Errors
    ///
    /// Returns [`OfferRepositoryError::DuplicateOffer`] when the provider
    /// already has an offer on the task.
    async fn insert(&self, offer: &Offer) -> OfferRepositoryResult<()>;

    /// Persists `offer` only if the stored status still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`OfferRepositoryError::NotFound`] or
    /// [`OfferRepositoryError::StatusConflict`] when another writer decided
    /// the offer first.
    async fn update_if_status(
        &self,
        offer: &Offer,
        expected: OfferStatus,
    ) -> OfferRepositoryResult<()>;

    /// Finds an offer by identifier.
    async fn find_by_id(&self, id: OfferId) -> OfferRepositoryResult<Option<Offer>>;

    /// Finds the provider's offer on a task, if any.
    async fn find_by_task_and_provider(
        &self,
        task_id: TaskId,
        provider: UserId,
    ) -> OfferRepositoryResult<Option<Offer>>;

    /// Lists offers on a task, newest first.
    async fn list_by_task(&self, task_id: TaskId) -> OfferRepositoryResult<Vec<Offer>>;

    /// Lists offers written by a provider, newest first.
    async fn list_by_provider(&self, provider: UserId) -> OfferRepositoryResult<Vec<Offer>>;

    /// Counts offers on a task.
    async fn count_by_task(&self, task_id: TaskId) -> OfferRepositoryResult<u32>;
}

/// Errors returned by offer repository implementations.
#[derive(Debug, Clone, Error)]
pub enum OfferRepositoryError {
    /// The provider already has an offer on the task.
    #[error("provider {provider} already has an offer on task {task_id}")]
    DuplicateOffer {
        /// Targeted task.
        task_id: TaskId,
        /// Bidding provider.
        provider: UserId,
    },

    /// An offer with the same identifier already exists.
    #[error("duplicate offer identifier: {0}")]
    DuplicateId(OfferId),

    /// The offer was not found.
    #[error("offer not found: {0}")]
    NotFound(OfferId),

    /// The conditional write lost against another writer.
    #[error("offer {offer_id} status is {actual}, expected {expected}")]
    StatusConflict {
        /// Offer whose write was rejected.
        offer_id: OfferId,
        /// Status the writer expected.
        expected: OfferStatus,
        /// Status found at write time.
        actual: OfferStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OfferRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
