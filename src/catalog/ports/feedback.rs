//! Repository ports for listing reviews and user favorites.

use crate::{
    catalog::domain::{Review, ReviewId, ServiceId},
    identity::domain::UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Review persistence contract.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Stores a new review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicateReview`] when the review ID
    /// already exists.
    async fn store(&self, review: &Review) -> ReviewRepositoryResult<()>;

    /// Lists the reviews of a listing, newest first.
    async fn list_for_service(&self, service_id: ServiceId) -> ReviewRepositoryResult<Vec<Review>>;
}

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// A review with the same identifier already exists.
    #[error("duplicate review identifier: {0}")]
    DuplicateReview(ReviewId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for favorite repository operations.
pub type FavoriteRepositoryResult<T> = Result<T, FavoriteRepositoryError>;

/// Per-user favorite listings.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Removes `service_id` from the user's favorites if present, otherwise
    /// adds it as favorited at `at`.
    ///
    /// The membership check and the write are one atomic step. Returns
    /// whether the listing is a favorite afterwards.
    async fn toggle(
        &self,
        user: UserId,
        service_id: ServiceId,
        at: DateTime<Utc>,
    ) -> FavoriteRepositoryResult<bool>;

    /// Lists the user's favorite listings, most recently added first.
    async fn list_for_user(&self, user: UserId) -> FavoriteRepositoryResult<Vec<ServiceId>>;
}

/// Errors returned by favorite repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FavoriteRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FavoriteRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
