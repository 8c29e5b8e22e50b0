//! Diesel row models for service listings and their feedback.

use super::schema::{favorites, reviews, services};
use crate::{
    catalog::{
        domain::{
            PersistedListingData, PersistedReviewData, Rating, Review, ReviewId, ServiceId,
            ServiceListing,
        },
        ports::{
            ReviewRepositoryError, ReviewRepositoryResult, ServiceRepositoryError,
            ServiceRepositoryResult,
        },
    },
    identity::domain::UserId,
    money::Money,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

/// Listing row, used for reads, inserts, and whole-record updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceRow {
    /// Listing identifier.
    pub id: uuid::Uuid,
    /// Providing user.
    pub owner_id: uuid::Uuid,
    /// Listing title.
    pub title: String,
    /// Listing description.
    pub description: String,
    /// Catalog category.
    pub category: String,
    /// Current price.
    pub price: Decimal,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&ServiceListing> for ServiceRow {
    fn from(listing: &ServiceListing) -> Self {
        Self {
            id: listing.id().into_inner(),
            owner_id: listing.owner().into_inner(),
            title: listing.title().to_owned(),
            description: listing.description().to_owned(),
            category: listing.category().to_owned(),
            price: listing.price().amount(),
            tags: listing.tags().to_vec(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

impl TryFrom<ServiceRow> for ServiceListing {
    type Error = ServiceRepositoryError;

    fn try_from(row: ServiceRow) -> ServiceRepositoryResult<Self> {
        Ok(Self::from_persisted(PersistedListingData {
            id: ServiceId::from_uuid(row.id),
            owner: UserId::from_uuid(row.owner_id),
            title: row.title,
            description: row.description,
            category: row.category,
            price: Money::new(row.price).map_err(ServiceRepositoryError::persistence)?,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// Review row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    /// Review identifier.
    pub id: uuid::Uuid,
    /// Reviewed listing.
    pub service_id: uuid::Uuid,
    /// Reviewing user.
    pub author_id: uuid::Uuid,
    /// Star rating.
    pub rating: i16,
    /// Review text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().into_inner(),
            service_id: review.service_id().into_inner(),
            author_id: review.author().into_inner(),
            rating: i16::from(review.rating().stars()),
            body: review.text().to_owned(),
            created_at: review.created_at(),
        }
    }
}

impl TryFrom<ReviewRow> for Review {
    type Error = ReviewRepositoryError;

    fn try_from(row: ReviewRow) -> ReviewRepositoryResult<Self> {
        let stars = u8::try_from(row.rating).map_err(ReviewRepositoryError::persistence)?;
        Ok(Self::from_persisted(PersistedReviewData {
            id: ReviewId::from_uuid(row.id),
            service_id: ServiceId::from_uuid(row.service_id),
            author: UserId::from_uuid(row.author_id),
            rating: Rating::new(stars).map_err(ReviewRepositoryError::persistence)?,
            text: row.body,
            created_at: row.created_at,
        }))
    }
}

/// Favorite insert row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub struct FavoriteRow {
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Favorite listing.
    pub service_id: uuid::Uuid,
    /// When the listing was added.
    pub created_at: DateTime<Utc>,
}
