//! Customer reviews of service listings.

use super::{ReviewId, ServiceId};
use crate::{identity::domain::UserId, validation::FieldError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Star rating between one and five inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Validates a star count.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when `stars` is outside `1..=5`.
    pub fn new(stars: u8) -> Result<Self, FieldError> {
        if !(Self::MIN..=Self::MAX).contains(&stars) {
            return Err(FieldError::new(
                "rating",
                format!("must be {}-{}, got {stars}", Self::MIN, Self::MAX),
            ));
        }
        Ok(Self(stars))
    }

    /// Returns the star count.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = FieldError;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Self::new(stars)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rating with optional text, left on a listing by a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    service_id: ServiceId,
    author: UserId,
    rating: Rating,
    text: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReviewData {
    /// Persisted review identifier.
    pub id: ReviewId,
    /// Reviewed listing.
    pub service_id: ServiceId,
    /// Reviewing user.
    pub author: UserId,
    /// Persisted rating.
    pub rating: Rating,
    /// Persisted text, empty when none was given.
    pub text: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review of `service_id` by `author`.
    #[must_use]
    pub fn new(
        service_id: ServiceId,
        author: UserId,
        rating: Rating,
        text: String,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            service_id,
            author,
            rating,
            text,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            service_id: data.service_id,
            author: data.author,
            rating: data.rating,
            text: data.text,
            created_at: data.created_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the reviewed listing.
    #[must_use]
    pub const fn service_id(&self) -> ServiceId {
        self.service_id
    }

    /// Returns the reviewing user.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the text; empty when the author left none.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
