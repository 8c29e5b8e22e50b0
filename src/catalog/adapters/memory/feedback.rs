//! In-memory repositories for reviews and favorites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    catalog::{
        domain::{Review, ReviewId, ServiceId},
        ports::{
            FavoriteRepository, FavoriteRepositoryError, FavoriteRepositoryResult,
            ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult,
        },
    },
    identity::domain::UserId,
};

/// Thread-safe in-memory review repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<ReviewId, Review>>>,
}

impl InMemoryReviewRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned_reviews(err: impl std::fmt::Display) -> ReviewRepositoryError {
    ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn store(&self, review: &Review) -> ReviewRepositoryResult<()> {
        let mut reviews = self.reviews.write().map_err(poisoned_reviews)?;
        if reviews.contains_key(&review.id()) {
            return Err(ReviewRepositoryError::DuplicateReview(review.id()));
        }
        reviews.insert(review.id(), review.clone());
        Ok(())
    }

    async fn list_for_service(&self, service_id: ServiceId) -> ReviewRepositoryResult<Vec<Review>> {
        let reviews = self.reviews.read().map_err(poisoned_reviews)?;
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|review| review.service_id() == service_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }
}

/// Thread-safe in-memory favorite sets, keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFavoriteRepository {
    favorites: Arc<RwLock<HashMap<UserId, Vec<(ServiceId, DateTime<Utc>)>>>>,
}

impl InMemoryFavoriteRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned_favorites(err: impl std::fmt::Display) -> FavoriteRepositoryError {
    FavoriteRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn toggle(
        &self,
        user: UserId,
        service_id: ServiceId,
        at: DateTime<Utc>,
    ) -> FavoriteRepositoryResult<bool> {
        let mut favorites = self.favorites.write().map_err(poisoned_favorites)?;
        let entries = favorites.entry(user).or_default();
        if let Some(position) = entries.iter().position(|(id, _)| *id == service_id) {
            entries.remove(position);
            return Ok(false);
        }
        entries.push((service_id, at));
        Ok(true)
    }

    async fn list_for_user(&self, user: UserId) -> FavoriteRepositoryResult<Vec<ServiceId>> {
        let favorites = self.favorites.read().map_err(poisoned_favorites)?;
        let mut entries = favorites.get(&user).cloned().unwrap_or_default();
        // Later insertions win ties.
        entries.reverse();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(entries.into_iter().map(|(id, _)| id).collect())
    }
}
