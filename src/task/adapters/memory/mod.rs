//! In-memory task adapters.

mod geocoder;
mod task;

pub use geocoder::StaticGeocoder;
pub use task::InMemoryTaskRepository;
