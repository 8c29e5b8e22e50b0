//! Service layer for task creation, editing, listing, and status updates.

use crate::{
    config::TaskLimits,
    error::ErrorKind,
    identity::domain::{Actor, UserId},
    notification::{DomainEvent, emit_best_effort, ports::NotificationSink},
    task::{
        domain::{
            BudgetType, Location, PhotoUrl, Task, TaskDetails, TaskDomainError, TaskEdit,
            TaskFilter, TaskId, TaskStatus,
        },
        ports::{Geocoder, MediaStore, TaskRepository, TaskRepositoryError},
    },
    validation::{FieldError, bounded_text, minimum_amount, required_text},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for posting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    category: String,
    location: String,
    budget_type: BudgetType,
    budget: Decimal,
    scheduled_at: Option<DateTime<Utc>>,
    photo_refs: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        budget_type: BudgetType,
        budget: Decimal,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            location: location.into(),
            budget_type,
            budget,
            scheduled_at: None,
            photo_refs: Vec::new(),
        }
    }

    /// Sets the requested time of the work.
    #[must_use]
    pub const fn with_scheduled_at(mut self, scheduled_at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    /// Attaches stored photo references.
    #[must_use]
    pub fn with_photo_refs(mut self, refs: impl IntoIterator<Item = String>) -> Self {
        self.photo_refs = refs.into_iter().collect();
        self
    }
}

/// Allow-listed partial update of a task; unset fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    location: Option<String>,
    budget_type: Option<BudgetType>,
    budget: Option<Decimal>,
    scheduled_at: Option<Option<DateTime<Utc>>>,
    added_photo_refs: Vec<String>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets a new free-text location; it is geocoded again.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets a new budget type.
    #[must_use]
    pub const fn with_budget_type(mut self, budget_type: BudgetType) -> Self {
        self.budget_type = Some(budget_type);
        self
    }

    /// Sets a new budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: Decimal) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Sets or clears the requested time.
    #[must_use]
    pub const fn with_scheduled_at(mut self, scheduled_at: Option<DateTime<Utc>>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    /// Appends stored photo references.
    #[must_use]
    pub fn with_added_photo_refs(mut self, refs: impl IntoIterator<Item = String>) -> Self {
        self.added_photo_refs.extend(refs);
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The actor may not act on the task.
    #[error("user {actor} may not modify task {task_id}")]
    Forbidden {
        /// Task the actor tried to modify.
        task_id: TaskId,
        /// Rejected actor.
        actor: UserId,
    },

    /// Domain validation or a transition rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl From<FieldError> for TaskServiceError {
    fn from(err: FieldError) -> Self {
        Self::Domain(TaskDomainError::Validation(err))
    }
}

impl TaskServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Domain(TaskDomainError::Validation(_)) => ErrorKind::ValidationFailed,
            Self::Domain(TaskDomainError::InvalidTransition { .. }) => {
                ErrorKind::InvalidTransition
            }
            Self::Domain(TaskDomainError::NotEditable { .. }) => ErrorKind::TaskNotOpen,
            Self::Repository(
                TaskRepositoryError::StatusConflict { .. }
                | TaskRepositoryError::StaleWrite { .. }
                | TaskRepositoryError::DuplicateTask(_),
            ) => ErrorKind::Conflict,
            Self::Repository(TaskRepositoryError::Persistence(_)) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<R, G, C>
where
    R: TaskRepository,
    G: Geocoder,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    geocoder: Arc<G>,
    media: Arc<dyn MediaStore>,
    notifications: Arc<dyn NotificationSink>,
    clock: Arc<C>,
    limits: TaskLimits,
}

impl<R, G, C> TaskService<R, G, C>
where
    R: TaskRepository,
    G: Geocoder,
    C: Clock + Send + Sync,
{
    /// Creates a task service with default field limits.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        geocoder: Arc<G>,
        media: Arc<dyn MediaStore>,
        notifications: Arc<dyn NotificationSink>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            geocoder,
            media,
            notifications,
            clock,
            limits: TaskLimits::default(),
        }
    }

    /// Replaces the field limits.
    #[must_use]
    pub fn with_limits(mut self, limits: TaskLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates and stores a new open task owned by `actor`.
    ///
    /// Geocoding failures are tolerated: the task is stored without
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a field is out of bounds or
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        actor: &Actor,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let title = bounded_text("title", &request.title, self.limits.title)?;
        let description =
            bounded_text("description", &request.description, self.limits.description)?;
        let category = required_text("category", &request.category)?;
        let location_text = bounded_text("location", &request.location, self.limits.location)?;
        let budget = minimum_amount("budget", request.budget, self.limits.min_budget)?;

        let details = TaskDetails {
            title,
            description,
            category,
            location: self.locate(location_text).await,
            photos: self.photo_urls(&request.photo_refs),
            budget_type: request.budget_type,
            budget,
            scheduled_at: request.scheduled_at,
        };
        let task = Task::new(actor.id(), details, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), client = %actor.id(), "task created");
        Ok(task)
    }

    /// Applies an allow-listed update to an open task owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], [`TaskServiceError::Forbidden`]
    /// for non-owners, [`TaskDomainError::NotEditable`] once the task left
    /// `open`, a validation error, or a conflict when another write landed
    /// after the task was read.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        actor: &Actor,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load(task_id).await?;
        if !task.is_owned_by(actor.id()) {
            tracing::debug!(task_id = %task_id, actor = %actor.id(), "task edit rejected");
            return Err(TaskServiceError::Forbidden {
                task_id,
                actor: actor.id(),
            });
        }

        let edit = self.build_edit(request).await?;
        let read_at = task.updated_at();
        task.apply_edit(edit, &*self.clock)?;
        self.repository
            .update_details_if_unchanged(&task, read_at)
            .await?;
        tracing::info!(task_id = %task_id, "task updated");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.load(task_id).await
    }

    /// Lists tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the query fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Completes or cancels a task.
    ///
    /// The client may always request a legal edge; a provider only once
    /// assigned to the task. The assignment edge is never accepted here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for unauthorized actors,
    /// [`TaskDomainError::InvalidTransition`] for edges outside the graph,
    /// or a conflict when another writer changed the status first.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        target: TaskStatus,
        actor: &Actor,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load(task_id).await?;
        if !task.is_owned_by(actor.id()) && !task.is_assigned_to(actor.id()) {
            tracing::debug!(task_id = %task_id, actor = %actor.id(), "task status change rejected");
            return Err(TaskServiceError::Forbidden {
                task_id,
                actor: actor.id(),
            });
        }

        let previous = task.status();
        task.transition_to(target, &*self.clock)?;
        self.repository.update_if_status(&task, previous).await?;
        tracing::info!(task_id = %task_id, from = %previous, to = %target, "task status changed");
        emit_best_effort(
            self.notifications.as_ref(),
            DomainEvent::TaskStatusChanged {
                task_id,
                from: previous,
                to: target,
            },
        )
        .await;
        Ok(task)
    }

    async fn load(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))
    }

    async fn build_edit(&self, request: UpdateTaskRequest) -> TaskServiceResult<TaskEdit> {
        let UpdateTaskRequest {
            title,
            description,
            category,
            location,
            budget_type,
            budget,
            scheduled_at,
            added_photo_refs,
        } = request;

        let mut edit = TaskEdit::new();
        if let Some(value) = title {
            edit = edit.with_title(bounded_text("title", &value, self.limits.title)?);
        }
        if let Some(value) = description {
            edit = edit.with_description(bounded_text(
                "description",
                &value,
                self.limits.description,
            )?);
        }
        if let Some(value) = category {
            edit = edit.with_category(required_text("category", &value)?);
        }
        if let Some(value) = location {
            let text = bounded_text("location", &value, self.limits.location)?;
            edit = edit.with_location(self.locate(text).await);
        }
        if let Some(value) = budget_type {
            edit = edit.with_budget_type(value);
        }
        if let Some(value) = budget {
            edit = edit.with_budget(minimum_amount("budget", value, self.limits.min_budget)?);
        }
        if let Some(value) = scheduled_at {
            edit = edit.with_scheduled_at(value);
        }
        Ok(edit.with_added_photos(self.photo_urls(&added_photo_refs)))
    }

    async fn locate(&self, text: String) -> Location {
        let coordinates = match self.geocoder.resolve(&text).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(location = %text, error = %err, "geocoding failed");
                None
            }
        };
        Location::new(text, coordinates)
    }

    fn photo_urls(&self, refs: &[String]) -> Vec<PhotoUrl> {
        refs.iter()
            .map(|file_ref| self.media.stored_url(file_ref))
            .collect()
    }
}
