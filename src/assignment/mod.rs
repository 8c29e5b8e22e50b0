//! Offer acceptance: the one operation that writes three aggregates at once.
//!
//! Accepting an offer assigns the task, marks the offer accepted and creates
//! the task's booking. [`services::AssignmentService`] checks preconditions
//! and builds the three post-images as an [`domain::Acceptance`]; an
//! [`ports::AssignmentStore`] commits them as one unit whose serialization
//! point is the conditional open to assigned task write.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
