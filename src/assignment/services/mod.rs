//! Application services for offer acceptance.

mod orchestrator;

pub use orchestrator::{AssignmentError, AssignmentResult, AssignmentService};
