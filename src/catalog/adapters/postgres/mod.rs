//! `PostgreSQL` adapters for the service catalog.

mod feedback;
mod models;
mod repository;
pub(crate) mod schema;

pub use feedback::{PostgresFavoriteRepository, PostgresReviewRepository};
pub use repository::PostgresServiceRepository;
