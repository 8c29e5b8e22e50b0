//! Domain model for offers.

mod error;
mod ids;
mod offer;
mod status;

pub use error::{OfferDomainError, ParseOfferStatusError};
pub use ids::OfferId;
pub use offer::{Offer, OfferTerms, PersistedOfferData};
pub use status::OfferStatus;
