//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use crate::validation::FieldError;
use thiserror::Error;

/// Errors returned by task domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// The requested status change is not an edge of the task graph, or is
    /// the assignment edge requested outside of offer acceptance.
    #[error("invalid task transition for {task_id}: {from} -> {to}")]
    InvalidTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status at the time of the request.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Descriptive and commercial fields are frozen outside `open`.
    #[error("task {task_id} cannot be edited while {status}")]
    NotEditable {
        /// Task that rejected the edit.
        task_id: TaskId,
        /// Current status.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing budget types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown budget type: {0}")]
pub struct ParseBudgetTypeError(pub String);
