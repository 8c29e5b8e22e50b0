//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{TaskRow, row_to_task, to_details_changeset, to_new_row, to_status_changeset},
    schema::tasks,
};
use crate::{
    postgres::{MarketplacePgPool, PersistenceFailure, run_blocking},
    task::{
        domain::{Task, TaskFilter, TaskId, TaskStatus},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for TaskRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: MarketplacePgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_if_status(
        &self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let owned = task.clone();
        run_blocking(&self.pool, move |connection| {
            update_task_if_status(connection, &owned, expected)
        })
        .await
    }

    async fn update_details_if_unchanged(
        &self,
        task: &Task,
        read_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_details_changeset(task)?;
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::status.eq(TaskStatus::Open.as_str()))
                    .filter(tasks::updated_at.eq(read_at)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated == 1 {
                return Ok(());
            }
            match explain_missed_update(connection, task_id, TaskStatus::Open) {
                TaskRepositoryError::StatusConflict {
                    actual: TaskStatus::Open,
                    ..
                } => Err(TaskRepositoryError::StaleWrite { task_id }),
                other => Err(other),
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = filter.clone();

        run_blocking(&self.pool, move |connection| {
            let mut query = tasks::table
                .filter(tasks::status.eq(criteria.status().as_str()))
                .select(TaskRow::as_select())
                .order(tasks::created_at.desc())
                .into_boxed();
            if let Some(category) = criteria.category() {
                query = query.filter(tasks::category.eq(category.to_owned()));
            }
            if let Some(text) = criteria.text() {
                let pattern = format!("%{}%", escape_like(text));
                query = query.filter(
                    tasks::title
                        .ilike(pattern.clone())
                        .or(tasks::description.ilike(pattern)),
                );
            }
            if let Some(min) = criteria.min_budget() {
                query = query.filter(tasks::budget.ge(min));
            }
            if let Some(max) = criteria.max_budget() {
                query = query.filter(tasks::budget.le(max));
            }
            // Distance is computed in process, so the cap applies afterwards.
            if criteria.proximity().is_none() {
                let limit = i64::try_from(criteria.limit()).unwrap_or(i64::MAX);
                query = query.limit(limit);
            }

            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let mut matching = Vec::new();
            for row in rows {
                let task = row_to_task(row)?;
                if criteria.matches_proximity(&task) {
                    matching.push(task);
                }
                if matching.len() >= criteria.limit() {
                    break;
                }
            }
            Ok(matching)
        })
        .await
    }

    async fn increment_offers_count(&self, id: TaskId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .set(tasks::offers_count.eq(tasks::offers_count + 1))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn set_offers_count(&self, id: TaskId, count: u32) -> TaskRepositoryResult<()> {
        let stored_count = i32::try_from(count).map_err(TaskRepositoryError::persistence)?;
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .set(tasks::offers_count.eq(stored_count))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

/// Writes the lifecycle fields of `task` only while the stored status equals
/// `expected`.
///
/// Runs on the caller's connection so the assignment store can use it inside
/// its transaction.
pub(crate) fn update_task_if_status(
    connection: &mut PgConnection,
    task: &Task,
    expected: TaskStatus,
) -> TaskRepositoryResult<()> {
    let task_id = task.id();
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(task_id.into_inner()))
            .filter(tasks::status.eq(expected.as_str())),
    )
    .set(&to_status_changeset(task))
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)?;
    if updated == 1 {
        return Ok(());
    }
    Err(explain_missed_update(connection, task_id, expected))
}

/// Distinguishes a missing row from a lost conditional write.
fn explain_missed_update(
    connection: &mut PgConnection,
    task_id: TaskId,
    expected: TaskStatus,
) -> TaskRepositoryError {
    let current = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select(tasks::status)
        .first::<String>(connection)
        .optional();
    match current {
        Ok(None) => TaskRepositoryError::NotFound(task_id),
        Ok(Some(status)) => match TaskStatus::try_from(status.as_str()) {
            Ok(actual) => TaskRepositoryError::StatusConflict {
                task_id,
                expected,
                actual,
            },
            Err(err) => TaskRepositoryError::persistence(err),
        },
        Err(err) => TaskRepositoryError::persistence(err),
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
