//! `PostgreSQL` adapters for task persistence.

pub(crate) mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresTaskRepository;
pub(crate) use repository::update_task_if_status;
