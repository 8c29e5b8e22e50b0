//! `PostgreSQL` adapters for offer persistence.

pub(crate) mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresOfferRepository;
pub(crate) use repository::update_offer_if_status;
