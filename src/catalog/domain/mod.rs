//! Domain model for catalog service listings and their feedback.

mod error;
mod filter;
mod ids;
mod listing;
mod review;

pub use error::CatalogDomainError;
pub use filter::ServiceFilter;
pub use ids::{ReviewId, ServiceId};
pub use listing::{ListingEdit, PersistedListingData, ServiceListing};
pub use review::{PersistedReviewData, Rating, Review};
