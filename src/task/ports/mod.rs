//! Port contracts for task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod geocoder;
pub mod media;
pub mod repository;

pub use geocoder::{GeocodeError, Geocoder};
pub use media::MediaStore;
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
