//! Task aggregate root.

use super::{BudgetType, Location, PhotoUrl, TaskDomainError, TaskId, TaskStatus};
use crate::{
    identity::domain::UserId,
    lifecycle::{StatusGraph, check_transition},
    money::Money,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive and commercial fields of a task.
///
/// These fields are editable by the client only while the task is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// Short summary.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Catalog category.
    pub category: String,
    /// Where the work happens.
    pub location: Location,
    /// Photos attached by the client.
    pub photos: Vec<PhotoUrl>,
    /// Pricing model of the budget.
    pub budget_type: BudgetType,
    /// Amount the client is willing to pay.
    pub budget: Money,
    /// Requested time of the work, if any.
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Validated partial update of [`TaskDetails`].
///
/// Only fields set on the edit are changed. Photos are appended, never
/// replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEdit {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    location: Option<Location>,
    budget_type: Option<BudgetType>,
    budget: Option<Money>,
    scheduled_at: Option<Option<DateTime<Utc>>>,
    added_photos: Vec<PhotoUrl>,
}

impl TaskEdit {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// Replaces the category.
    #[must_use]
    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    /// Replaces the location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Replaces the budget type.
    #[must_use]
    pub const fn with_budget_type(mut self, budget_type: BudgetType) -> Self {
        self.budget_type = Some(budget_type);
        self
    }

    /// Replaces the budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: Money) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Replaces the schedule; `None` clears it.
    #[must_use]
    pub const fn with_scheduled_at(mut self, scheduled_at: Option<DateTime<Utc>>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    /// Appends photos.
    #[must_use]
    pub fn with_added_photos(mut self, photos: impl IntoIterator<Item = PhotoUrl>) -> Self {
        self.added_photos.extend(photos);
        self
    }

    /// Returns whether the edit changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    client: UserId,
    details: TaskDetails,
    status: TaskStatus,
    assigned_provider: Option<UserId>,
    offers_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub client: UserId,
    /// Persisted descriptive and commercial fields.
    pub details: TaskDetails,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted assigned provider, if any.
    pub assigned_provider: Option<UserId>,
    /// Persisted offer counter.
    pub offers_count: u32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task owned by `client`.
    #[must_use]
    pub fn new(client: UserId, details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            client,
            details,
            status: TaskStatus::Open,
            assigned_provider: None,
            offers_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            client: data.client,
            details: data.details,
            status: data.status,
            assigned_provider: data.assigned_provider,
            offers_count: data.offers_count,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client(&self) -> UserId {
        self.client
    }

    /// Returns the descriptive and commercial fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assigned provider, set only while assigned or completed.
    #[must_use]
    pub const fn assigned_provider(&self) -> Option<UserId> {
        self.assigned_provider
    }

    /// Returns the denormalized offer counter.
    ///
    /// The counter is informational and may drift; never use it to decide
    /// anything.
    #[must_use]
    pub const fn offers_count(&self) -> u32 {
        self.offers_count
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` owns the task.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.client == user
    }

    /// Returns whether `user` is the assigned provider.
    #[must_use]
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_provider == Some(user)
    }

    /// Overwrites the offer counter; only repositories call this.
    pub(crate) const fn set_offers_count(&mut self, count: u32) {
        self.offers_count = count;
    }

    /// Copies the lifecycle fields of `source`; only repositories call this.
    pub(crate) const fn adopt_status(&mut self, source: &Self) {
        self.status = source.status;
        self.assigned_provider = source.assigned_provider;
        self.updated_at = source.updated_at;
    }

    /// Copies the editable details of `source`; only repositories call this.
    pub(crate) fn adopt_details(&mut self, source: &Self) {
        self.details.clone_from(&source.details);
        self.updated_at = source.updated_at;
    }

    /// Applies a partial update to the descriptive and commercial fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotEditable`] unless the task is open.
    pub fn apply_edit(&mut self, edit: TaskEdit, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Open {
            return Err(TaskDomainError::NotEditable {
                task_id: self.id,
                status: self.status,
            });
        }

        let TaskEdit {
            title,
            description,
            category,
            location,
            budget_type,
            budget,
            scheduled_at,
            added_photos,
        } = edit;
        let details = &mut self.details;
        if let Some(value) = title {
            details.title = value;
        }
        if let Some(value) = description {
            details.description = value;
        }
        if let Some(value) = category {
            details.category = value;
        }
        if let Some(value) = location {
            details.location = value;
        }
        if let Some(value) = budget_type {
            details.budget_type = value;
        }
        if let Some(value) = budget {
            details.budget = value;
        }
        if let Some(value) = scheduled_at {
            details.scheduled_at = value;
        }
        details.photos.extend(added_photos);
        self.touch(clock);
        Ok(())
    }

    /// Assigns the task to `provider`, moving it from open to assigned.
    ///
    /// Only offer acceptance calls this; the coupled offer and booking
    /// writes are the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// open.
    pub fn assign(&mut self, provider: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.check_edge(TaskStatus::Assigned)?;
        self.status = TaskStatus::Assigned;
        self.assigned_provider = Some(provider);
        self.touch(clock);
        Ok(())
    }

    /// Moves the task along a non-assignment edge (complete or cancel).
    ///
    /// Cancelling clears the assigned provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the edge is not in
    /// the graph or targets `assigned`, which only [`Task::assign`] may take.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if target == TaskStatus::Assigned {
            return Err(self.invalid_transition(target));
        }
        self.check_edge(target)?;
        self.status = target;
        if !target.has_provider() {
            self.assigned_provider = None;
        }
        self.touch(clock);
        Ok(())
    }

    /// Returns whether a status-only transition to `target` is permitted.
    #[must_use]
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        target != TaskStatus::Assigned && self.status.can_transition_to(target)
    }

    fn check_edge(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        check_transition(self.status, target).map_err(|_| self.invalid_transition(target))
    }

    const fn invalid_transition(&self, target: TaskStatus) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            from: self.status,
            to: target,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
