//! `PostgreSQL` repositories for reviews and favorites.

use super::{
    models::{FavoriteRow, ReviewRow},
    schema::{favorites, reviews},
};
use crate::{
    catalog::{
        domain::{Review, ServiceId},
        ports::{
            FavoriteRepository, FavoriteRepositoryError, FavoriteRepositoryResult,
            ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult,
        },
    },
    identity::domain::UserId,
    postgres::{MarketplacePgPool, PersistenceFailure, run_blocking},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for ReviewRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for FavoriteRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed review repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: MarketplacePgPool,
}

impl PostgresReviewRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn store(&self, review: &Review) -> ReviewRepositoryResult<()> {
        let review_id = review.id();
        let row = ReviewRow::from(review);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(reviews::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateReview(review_id)
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for_service(&self, service_id: ServiceId) -> ReviewRepositoryResult<Vec<Review>> {
        run_blocking(&self.pool, move |connection| {
            let rows = reviews::table
                .filter(reviews::service_id.eq(service_id.into_inner()))
                .order(reviews::created_at.desc())
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(Review::try_from).collect()
        })
        .await
    }
}

/// `PostgreSQL`-backed favorite repository.
#[derive(Debug, Clone)]
pub struct PostgresFavoriteRepository {
    pool: MarketplacePgPool,
}

impl PostgresFavoriteRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PostgresFavoriteRepository {
    async fn toggle(
        &self,
        user: UserId,
        service_id: ServiceId,
        at: DateTime<Utc>,
    ) -> FavoriteRepositoryResult<bool> {
        let row = FavoriteRow {
            user_id: user.into_inner(),
            service_id: service_id.into_inner(),
            created_at: at,
        };
        run_blocking(&self.pool, move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    let removed = diesel::delete(
                        favorites::table
                            .filter(favorites::user_id.eq(row.user_id))
                            .filter(favorites::service_id.eq(row.service_id)),
                    )
                    .execute(tx)?;
                    if removed > 0 {
                        return Ok(false);
                    }
                    diesel::insert_into(favorites::table)
                        .values(&row)
                        .on_conflict_do_nothing()
                        .execute(tx)?;
                    Ok(true)
                })
                .map_err(FavoriteRepositoryError::persistence)
        })
        .await
    }

    async fn list_for_user(&self, user: UserId) -> FavoriteRepositoryResult<Vec<ServiceId>> {
        run_blocking(&self.pool, move |connection| {
            let ids = favorites::table
                .filter(favorites::user_id.eq(user.into_inner()))
                .order(favorites::created_at.desc())
                .select(favorites::service_id)
                .load::<uuid::Uuid>(connection)
                .map_err(FavoriteRepositoryError::persistence)?;
            Ok(ids.into_iter().map(ServiceId::from_uuid).collect())
        })
        .await
    }
}
