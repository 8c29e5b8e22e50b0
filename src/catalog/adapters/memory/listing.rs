//! In-memory repository for service listings.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{ServiceFilter, ServiceId, ServiceListing},
    ports::{ServiceRepository, ServiceRepositoryError, ServiceRepositoryResult},
};

/// Thread-safe in-memory listing repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceRepository {
    listings: Arc<RwLock<HashMap<ServiceId, ServiceListing>>>,
}

impl InMemoryServiceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> ServiceRepositoryError {
    ServiceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn store(&self, listing: &ServiceListing) -> ServiceRepositoryResult<()> {
        let mut listings = self.listings.write().map_err(poisoned)?;
        if listings.contains_key(&listing.id()) {
            return Err(ServiceRepositoryError::DuplicateService(listing.id()));
        }
        listings.insert(listing.id(), listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &ServiceListing) -> ServiceRepositoryResult<()> {
        let mut listings = self.listings.write().map_err(poisoned)?;
        let slot = listings
            .get_mut(&listing.id())
            .ok_or(ServiceRepositoryError::NotFound(listing.id()))?;
        *slot = listing.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: ServiceId) -> ServiceRepositoryResult<Option<ServiceListing>> {
        let listings = self.listings.read().map_err(poisoned)?;
        Ok(listings.get(&id).cloned())
    }

    async fn list(&self, filter: &ServiceFilter) -> ServiceRepositoryResult<Vec<ServiceListing>> {
        let listings = self.listings.read().map_err(poisoned)?;
        let mut matching: Vec<ServiceListing> = listings
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }
}
