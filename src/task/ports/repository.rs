//! Repository port for task persistence and conditional status writes.

use crate::task::domain::{Task, TaskFilter, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Writes the status, assigned provider, and update time of `task` only
    /// if the stored status still equals `expected`.
    ///
    /// The status comparison and the write are one atomic step at the store.
    /// Descriptive fields and the offer counter are left as stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::StatusConflict`] when another writer changed
    /// the status first.
    async fn update_if_status(&self, task: &Task, expected: TaskStatus)
    -> TaskRepositoryResult<()>;

    /// Writes the editable details and update time of `task` only if the
    /// stored task is still open and was last updated at `read_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, [`TaskRepositoryError::StatusConflict`] when it left `open`, or
    /// [`TaskRepositoryError::StaleWrite`] when another write landed after
    /// `read_at`.
    async fn update_details_if_unchanged(
        &self,
        task: &Task,
        read_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching `filter`, newest first, capped at its limit.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Atomically increments the denormalized offer counter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn increment_offers_count(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Overwrites the offer counter with a recomputed value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn set_offers_count(&self, id: TaskId, count: u32) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The conditional write lost against another writer.
    #[error("task {task_id} status is {actual}, expected {expected}")]
    StatusConflict {
        /// Task whose write was rejected.
        task_id: TaskId,
        /// Status the writer expected.
        expected: TaskStatus,
        /// Status found at write time.
        actual: TaskStatus,
    },

    /// The task changed after the writer read it.
    #[error("task {task_id} changed since it was read")]
    StaleWrite {
        /// Task whose write was rejected.
        task_id: TaskId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
