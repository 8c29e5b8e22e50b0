//! In-memory repository for tasks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskFilter, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

/// Lock-protected task table.
#[derive(Debug, Default)]
pub(crate) struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskState {
    /// Fails unless the stored task exists and has status `expected`.
    pub(crate) fn ensure_status(&self, id: TaskId, expected: TaskStatus) -> TaskRepositoryResult<()> {
        let stored = self.tasks.get(&id).ok_or(TaskRepositoryError::NotFound(id))?;
        if stored.status() != expected {
            return Err(TaskRepositoryError::StatusConflict {
                task_id: id,
                expected,
                actual: stored.status(),
            });
        }
        Ok(())
    }

    /// Copies the lifecycle fields of `task` onto the stored task if its
    /// status is still `expected`.
    pub(crate) fn write_status_if(
        &mut self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        self.ensure_status(task.id(), expected)?;
        let stored = self
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        stored.adopt_status(task);
        Ok(())
    }

    /// Copies the editable details of `task` onto the stored task if it is
    /// still open and unchanged since `read_at`.
    fn write_details_if_unchanged(
        &mut self,
        task: &Task,
        read_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        self.ensure_status(task.id(), TaskStatus::Open)?;
        let stored = self
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.updated_at() != read_at {
            return Err(TaskRepositoryError::StaleWrite { task_id: task.id() });
        }
        stored.adopt_details(task);
        Ok(())
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Acquires the write lock; shared with the in-memory assignment store.
    pub(crate) fn write_state(
        &self,
    ) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_if_status(
        &self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.write_status_if(task, expected)
    }

    async fn update_details_if_unchanged(
        &self,
        task: &Task,
        read_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        state.write_details_if_unchanged(task, read_at)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        matching.truncate(filter.limit());
        Ok(matching)
    }

    async fn increment_offers_count(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.set_offers_count(task.offers_count().saturating_add(1));
        Ok(())
    }

    async fn set_offers_count(&self, id: TaskId, count: u32) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.set_offers_count(count);
        Ok(())
    }
}
