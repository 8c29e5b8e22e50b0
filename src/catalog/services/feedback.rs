//! Listing reviews and per-user favorites.

use crate::{
    catalog::{
        domain::{CatalogDomainError, Rating, Review, ServiceId, ServiceListing},
        ports::{
            FavoriteRepository, FavoriteRepositoryError, ReviewRepository, ReviewRepositoryError,
            ServiceRepository, ServiceRepositoryError,
        },
    },
    config::ReviewLimits,
    error::ErrorKind,
    identity::domain::Actor,
    validation::{FieldError, optional_text},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for reviewing a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReviewRequest {
    rating: u8,
    text: Option<String>,
}

impl CreateReviewRequest {
    /// Creates a request with a star rating and no text.
    #[must_use]
    pub const fn new(rating: u8) -> Self {
        Self { rating, text: None }
    }

    /// Sets the review text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Service-level errors for reviews and favorites.
#[derive(Debug, Error)]
pub enum FeedbackServiceError {
    /// The listing does not exist.
    #[error("service not found: {0}")]
    ServiceNotFound(ServiceId),

    /// A field failed validation.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// Listing lookup failed.
    #[error(transparent)]
    Listings(#[from] ServiceRepositoryError),

    /// Review persistence failed.
    #[error(transparent)]
    Reviews(#[from] ReviewRepositoryError),

    /// Favorite persistence failed.
    #[error(transparent)]
    Favorites(#[from] FavoriteRepositoryError),
}

impl From<FieldError> for FeedbackServiceError {
    fn from(err: FieldError) -> Self {
        Self::Domain(CatalogDomainError::Validation(err))
    }
}

impl FeedbackServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ServiceNotFound(_) | Self::Listings(ServiceRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Domain(_) => ErrorKind::ValidationFailed,
            Self::Listings(ServiceRepositoryError::DuplicateService(_))
            | Self::Reviews(ReviewRepositoryError::DuplicateReview(_)) => ErrorKind::Conflict,
            Self::Listings(ServiceRepositoryError::Persistence(_))
            | Self::Reviews(ReviewRepositoryError::Persistence(_))
            | Self::Favorites(FavoriteRepositoryError::Persistence(_)) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for feedback service operations.
pub type FeedbackServiceResult<T> = Result<T, FeedbackServiceError>;

/// Reviews and favorites over the catalog's listings.
#[derive(Clone)]
pub struct FeedbackService<S, V, F, C>
where
    S: ServiceRepository,
    V: ReviewRepository,
    F: FavoriteRepository,
    C: Clock + Send + Sync,
{
    listings: Arc<S>,
    reviews: Arc<V>,
    favorites: Arc<F>,
    clock: Arc<C>,
    limits: ReviewLimits,
}

impl<S, V, F, C> FeedbackService<S, V, F, C>
where
    S: ServiceRepository,
    V: ReviewRepository,
    F: FavoriteRepository,
    C: Clock + Send + Sync,
{
    /// Creates a feedback service with default review limits.
    #[must_use]
    pub fn new(listings: Arc<S>, reviews: Arc<V>, favorites: Arc<F>, clock: Arc<C>) -> Self {
        Self {
            listings,
            reviews,
            favorites,
            clock,
            limits: ReviewLimits::default(),
        }
    }

    /// Replaces the review limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: ReviewLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Records a review of `service_id` written by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackServiceError::ServiceNotFound`], a validation error
    /// for a rating outside 1 to 5 or overlong text, or a repository error.
    pub async fn create_review(
        &self,
        service_id: ServiceId,
        actor: &Actor,
        request: CreateReviewRequest,
    ) -> FeedbackServiceResult<Review> {
        self.ensure_listing(service_id).await?;
        let rating = Rating::new(request.rating)?;
        let text = optional_text("text", request.text.as_deref(), self.limits.max_text_chars)?
            .unwrap_or_default();

        let review = Review::new(service_id, actor.id(), rating, text, &*self.clock);
        self.reviews.store(&review).await?;
        tracing::info!(
            review_id = %review.id(),
            service_id = %service_id,
            author = %actor.id(),
            rating = %rating,
            "review created"
        );
        Ok(review)
    }

    /// Lists the reviews of a listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackServiceError::ServiceNotFound`] or a repository
    /// error.
    pub async fn list_reviews(&self, service_id: ServiceId) -> FeedbackServiceResult<Vec<Review>> {
        self.ensure_listing(service_id).await?;
        Ok(self.reviews.list_for_service(service_id).await?)
    }

    /// Adds the listing to the actor's favorites, or removes it when it is
    /// already there. Returns whether it is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackServiceError::ServiceNotFound`] or a repository
    /// error.
    pub async fn toggle_favorite(
        &self,
        service_id: ServiceId,
        actor: &Actor,
    ) -> FeedbackServiceResult<bool> {
        self.ensure_listing(service_id).await?;
        let favorited = self
            .favorites
            .toggle(actor.id(), service_id, self.clock.utc())
            .await?;
        tracing::debug!(service_id = %service_id, user = %actor.id(), favorited, "favorite toggled");
        Ok(favorited)
    }

    /// Lists the actor's favorite listings, most recently added first.
    ///
    /// # Errors
    ///
    /// Returns a repository error when a lookup fails.
    pub async fn list_favorites(&self, actor: &Actor) -> FeedbackServiceResult<Vec<ServiceListing>> {
        let ids = self.favorites.list_for_user(actor.id()).await?;
        let mut listings = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(listing) = self.listings.find_by_id(id).await? {
                listings.push(listing);
            }
        }
        Ok(listings)
    }

    async fn ensure_listing(&self, service_id: ServiceId) -> FeedbackServiceResult<()> {
        if self.listings.find_by_id(service_id).await?.is_none() {
            return Err(FeedbackServiceError::ServiceNotFound(service_id));
        }
        Ok(())
    }
}
