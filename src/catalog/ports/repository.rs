//! Repository port for service listings.

use crate::catalog::domain::{ServiceFilter, ServiceId, ServiceListing};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type ServiceRepositoryResult<T> = Result<T, ServiceRepositoryError>;

/// Service listing persistence contract.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Stores a new listing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRepositoryError::DuplicateService`] when the ID
    /// already exists.
    async fn store(&self, listing: &ServiceListing) -> ServiceRepositoryResult<()>;

    /// Replaces an existing listing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRepositoryError::NotFound`] when the listing does not
    /// exist.
    async fn update(&self, listing: &ServiceListing) -> ServiceRepositoryResult<()>;

    /// Finds a listing by identifier.
    async fn find_by_id(&self, id: ServiceId) -> ServiceRepositoryResult<Option<ServiceListing>>;

    /// Lists listings matching `filter`, newest first.
    async fn list(&self, filter: &ServiceFilter) -> ServiceRepositoryResult<Vec<ServiceListing>>;
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ServiceRepositoryError {
    /// A listing with the same identifier already exists.
    #[error("duplicate service identifier: {0}")]
    DuplicateService(ServiceId),

    /// The listing was not found.
    #[error("service not found: {0}")]
    NotFound(ServiceId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
