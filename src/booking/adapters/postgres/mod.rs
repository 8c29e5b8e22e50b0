//! `PostgreSQL` adapters for booking persistence.

pub(crate) mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresBookingRepository;
pub(crate) use repository::insert_booking;
