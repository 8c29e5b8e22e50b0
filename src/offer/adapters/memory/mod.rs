//! In-memory offer adapters.

mod offer;

pub use offer::InMemoryOfferRepository;
