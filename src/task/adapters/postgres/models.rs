//! Diesel row models for task persistence.

use super::schema::tasks;
use crate::{
    identity::domain::UserId,
    money::Money,
    task::{
        domain::{
            BudgetType, Coordinates, Location, PersistedTaskData, PhotoUrl, Task, TaskDetails,
            TaskId, TaskStatus,
        },
        ports::{TaskRepositoryError, TaskRepositoryResult},
    },
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning client.
    pub client_id: uuid::Uuid,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Catalog category.
    pub category: String,
    /// Free-text location.
    pub location_text: String,
    /// Geocoded latitude.
    pub latitude: Option<f64>,
    /// Geocoded longitude.
    pub longitude: Option<f64>,
    /// Photo URLs.
    pub photos: Value,
    /// Budget pricing model.
    pub budget_type: String,
    /// Budget amount.
    pub budget: Decimal,
    /// Requested time of the work.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
    /// Assigned provider.
    pub assigned_provider_id: Option<uuid::Uuid>,
    /// Offer counter.
    pub offers_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning client.
    pub client_id: uuid::Uuid,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Catalog category.
    pub category: String,
    /// Free-text location.
    pub location_text: String,
    /// Geocoded latitude.
    pub latitude: Option<f64>,
    /// Geocoded longitude.
    pub longitude: Option<f64>,
    /// Photo URLs.
    pub photos: Value,
    /// Budget pricing model.
    pub budget_type: String,
    /// Budget amount.
    pub budget: Decimal,
    /// Requested time of the work.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
    /// Assigned provider.
    pub assigned_provider_id: Option<uuid::Uuid>,
    /// Offer counter.
    pub offers_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Edit of the descriptive and commercial fields; lifecycle fields, identity,
/// and the offer counter are written elsewhere.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskDetailsChangeset {
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Catalog category.
    pub category: String,
    /// Free-text location.
    pub location_text: String,
    /// Geocoded latitude.
    pub latitude: Option<f64>,
    /// Geocoded longitude.
    pub longitude: Option<f64>,
    /// Photo URLs.
    pub photos: Value,
    /// Budget pricing model.
    pub budget_type: String,
    /// Budget amount.
    pub budget: Decimal,
    /// Requested time of the work.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle update written on status edges and offer acceptance.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskStatusChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Assigned provider.
    pub assigned_provider_id: Option<uuid::Uuid>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn photos_value(task: &Task) -> TaskRepositoryResult<Value> {
    serde_json::to_value(&task.details().photos).map_err(TaskRepositoryError::persistence)
}

/// Builds an insert row from a task aggregate.
pub fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let details = task.details();
    let coordinates = details.location.coordinates();
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        client_id: task.client().into_inner(),
        title: details.title.clone(),
        description: details.description.clone(),
        category: details.category.clone(),
        location_text: details.location.text().to_owned(),
        latitude: coordinates.map(Coordinates::lat),
        longitude: coordinates.map(Coordinates::lng),
        photos: photos_value(task)?,
        budget_type: details.budget_type.as_str().to_owned(),
        budget: details.budget.amount(),
        scheduled_at: details.scheduled_at,
        status: task.status().as_str().to_owned(),
        assigned_provider_id: task.assigned_provider().map(UserId::into_inner),
        offers_count: i32::try_from(task.offers_count())
            .map_err(TaskRepositoryError::persistence)?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

/// Builds the changeset written by guarded edits.
pub fn to_details_changeset(task: &Task) -> TaskRepositoryResult<TaskDetailsChangeset> {
    let details = task.details();
    let coordinates = details.location.coordinates();
    Ok(TaskDetailsChangeset {
        title: details.title.clone(),
        description: details.description.clone(),
        category: details.category.clone(),
        location_text: details.location.text().to_owned(),
        latitude: coordinates.map(Coordinates::lat),
        longitude: coordinates.map(Coordinates::lng),
        photos: photos_value(task)?,
        budget_type: details.budget_type.as_str().to_owned(),
        budget: details.budget.amount(),
        scheduled_at: details.scheduled_at,
        updated_at: task.updated_at(),
    })
}

/// Builds the changeset written by conditional status updates.
#[must_use]
pub fn to_status_changeset(task: &Task) -> TaskStatusChangeset {
    TaskStatusChangeset {
        status: task.status().as_str().to_owned(),
        assigned_provider_id: task.assigned_provider().map(UserId::into_inner),
        updated_at: task.updated_at(),
    }
}

/// Reconstructs a task aggregate from a row.
pub fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        client_id,
        title,
        description,
        category,
        location_text,
        latitude,
        longitude,
        photos,
        budget_type,
        budget,
        scheduled_at,
        status,
        assigned_provider_id,
        offers_count,
        created_at,
        updated_at,
    } = row;

    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lng)) => {
            Some(Coordinates::new(lat, lng).map_err(TaskRepositoryError::persistence)?)
        }
        _ => None,
    };
    let photo_urls = serde_json::from_value::<Vec<PhotoUrl>>(photos)
        .map_err(TaskRepositoryError::persistence)?;
    let details = TaskDetails {
        title,
        description,
        category,
        location: Location::new(location_text, coordinates),
        photos: photo_urls,
        budget_type: BudgetType::try_from(budget_type.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        budget: Money::new(budget).map_err(TaskRepositoryError::persistence)?,
        scheduled_at,
    };

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        client: UserId::from_uuid(client_id),
        details,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        assigned_provider: assigned_provider_id.map(UserId::from_uuid),
        offers_count: u32::try_from(offers_count).map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    }))
}
