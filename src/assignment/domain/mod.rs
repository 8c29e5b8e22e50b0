//! Domain model for offer acceptance.

mod acceptance;
mod error;

pub use acceptance::Acceptance;
pub use error::AssignmentDomainError;
