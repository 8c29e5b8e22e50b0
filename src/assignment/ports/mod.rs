//! Port contracts for committing acceptances.

pub mod store;

pub use store::{AssignmentStore, AssignmentStoreError, AssignmentStoreResult};
