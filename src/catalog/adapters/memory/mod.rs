//! In-memory catalog adapters.

mod feedback;
mod listing;

pub use feedback::{InMemoryFavoriteRepository, InMemoryReviewRepository};
pub use listing::InMemoryServiceRepository;
