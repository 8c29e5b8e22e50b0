//! Port contracts for booking persistence.

pub mod repository;

pub use repository::{BookingRepository, BookingRepositoryError, BookingRepositoryResult};
