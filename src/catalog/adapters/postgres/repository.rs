//! `PostgreSQL` repository implementation for service listings.

use super::{models::ServiceRow, schema::services};
use crate::{
    catalog::{
        domain::{ServiceFilter, ServiceId, ServiceListing},
        ports::{ServiceRepository, ServiceRepositoryError, ServiceRepositoryResult},
    },
    postgres::{MarketplacePgPool, PersistenceFailure, run_blocking},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for ServiceRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed listing repository.
#[derive(Debug, Clone)]
pub struct PostgresServiceRepository {
    pool: MarketplacePgPool,
}

impl PostgresServiceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepository {
    async fn store(&self, listing: &ServiceListing) -> ServiceRepositoryResult<()> {
        let service_id = listing.id();
        let row = ServiceRow::from(listing);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(services::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ServiceRepositoryError::DuplicateService(service_id)
                    }
                    _ => ServiceRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, listing: &ServiceListing) -> ServiceRepositoryResult<()> {
        let service_id = listing.id();
        let row = ServiceRow::from(listing);
        run_blocking(&self.pool, move |connection| {
            let updated =
                diesel::update(services::table.filter(services::id.eq(service_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(ServiceRepositoryError::persistence)?;
            if updated == 0 {
                return Err(ServiceRepositoryError::NotFound(service_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ServiceId) -> ServiceRepositoryResult<Option<ServiceListing>> {
        run_blocking(&self.pool, move |connection| {
            let row = services::table
                .filter(services::id.eq(id.into_inner()))
                .select(ServiceRow::as_select())
                .first::<ServiceRow>(connection)
                .optional()
                .map_err(ServiceRepositoryError::persistence)?;
            row.map(ServiceListing::try_from).transpose()
        })
        .await
    }

    async fn list(&self, filter: &ServiceFilter) -> ServiceRepositoryResult<Vec<ServiceListing>> {
        let criteria = filter.clone();
        run_blocking(&self.pool, move |connection| {
            let mut query = services::table
                .select(ServiceRow::as_select())
                .order(services::created_at.desc())
                .into_boxed();
            if let Some(category) = criteria.category() {
                query = query.filter(services::category.eq(category.to_owned()));
            }
            if let Some(min) = criteria.min_price() {
                query = query.filter(services::price.ge(min));
            }
            if let Some(max) = criteria.max_price() {
                query = query.filter(services::price.le(max));
            }
            let rows = query
                .load::<ServiceRow>(connection)
                .map_err(ServiceRepositoryError::persistence)?;

            // Tag matching runs in process.
            let mut listings = Vec::with_capacity(rows.len());
            for row in rows {
                let listing = ServiceListing::try_from(row)?;
                if criteria.matches(&listing) {
                    listings.push(listing);
                }
            }
            Ok(listings)
        })
        .await
    }
}
