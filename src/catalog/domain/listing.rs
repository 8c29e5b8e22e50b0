//! Service listing aggregate.

use super::ServiceId;
use crate::{identity::domain::UserId, money::Money};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A fixed-price service offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceListing {
    id: ServiceId,
    owner: UserId,
    title: String,
    description: String,
    category: String,
    price: Money,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedListingData {
    /// Persisted listing identifier.
    pub id: ServiceId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted category.
    pub category: String,
    /// Persisted price.
    pub price: Money,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated partial update of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEdit {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New price; existing bookings keep their snapshot.
    pub price: Option<Money>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
}

impl ServiceListing {
    /// Creates a new listing owned by `owner`.
    #[must_use]
    pub fn new(
        owner: UserId,
        title: String,
        description: String,
        category: String,
        price: Money,
        tags: Vec<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ServiceId::new(),
            owner,
            title,
            description,
            category,
            price,
            tags,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a listing from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedListingData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            category: data.category,
            price: data.price,
            tags: data.tags,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the listing identifier.
    #[must_use]
    pub const fn id(&self) -> ServiceId {
        self.id
    }

    /// Returns the providing user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the current price.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a validated edit.
    pub fn apply_edit(&mut self, edit: ListingEdit, clock: &impl Clock) {
        let ListingEdit {
            title,
            description,
            category,
            price,
            tags,
        } = edit;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = category {
            self.category = value;
        }
        if let Some(value) = price {
            self.price = value;
        }
        if let Some(value) = tags {
            self.tags = value;
        }
        self.updated_at = clock.utc();
    }
}
