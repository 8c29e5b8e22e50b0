//! Port contracts for the service catalog.

pub mod feedback;
pub mod repository;

pub use feedback::{
    FavoriteRepository, FavoriteRepositoryError, FavoriteRepositoryResult, ReviewRepository,
    ReviewRepositoryError, ReviewRepositoryResult,
};
pub use repository::{ServiceRepository, ServiceRepositoryError, ServiceRepositoryResult};
