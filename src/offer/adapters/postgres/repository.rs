//! `PostgreSQL` repository implementation for offers.

use super::{models::OfferRow, schema::offers};
use crate::{
    identity::domain::UserId,
    offer::{
        domain::{Offer, OfferId, OfferStatus},
        ports::{OfferRepository, OfferRepositoryError, OfferRepositoryResult},
    },
    postgres::{MarketplacePgPool, PersistenceFailure, run_blocking},
    task::domain::TaskId,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for OfferRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed offer repository.
#[derive(Debug, Clone)]
pub struct PostgresOfferRepository {
    pool: MarketplacePgPool,
}

impl PostgresOfferRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for PostgresOfferRepository {
    async fn insert(&self, offer: &Offer) -> OfferRepositoryResult<()> {
        let offer_id = offer.id();
        let task_id = offer.task_id();
        let provider = offer.provider();
        let row = OfferRow::from(offer);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(offers::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_task_provider_unique_violation(info.as_ref()) =>
                    {
                        OfferRepositoryError::DuplicateOffer { task_id, provider }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        OfferRepositoryError::DuplicateId(offer_id)
                    }
                    _ => OfferRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_if_status(
        &self,
        offer: &Offer,
        expected: OfferStatus,
    ) -> OfferRepositoryResult<()> {
        let owned = offer.clone();
        run_blocking(&self.pool, move |connection| {
            update_offer_if_status(connection, &owned, expected)
        })
        .await
    }

    async fn find_by_id(&self, id: OfferId) -> OfferRepositoryResult<Option<Offer>> {
        run_blocking(&self.pool, move |connection| {
            let row = offers::table
                .filter(offers::id.eq(id.into_inner()))
                .select(OfferRow::as_select())
                .first::<OfferRow>(connection)
                .optional()
                .map_err(OfferRepositoryError::persistence)?;
            row.map(Offer::try_from).transpose()
        })
        .await
    }

    async fn find_by_task_and_provider(
        &self,
        task_id: TaskId,
        provider: UserId,
    ) -> OfferRepositoryResult<Option<Offer>> {
        run_blocking(&self.pool, move |connection| {
            let row = offers::table
                .filter(offers::task_id.eq(task_id.into_inner()))
                .filter(offers::provider_id.eq(provider.into_inner()))
                .select(OfferRow::as_select())
                .first::<OfferRow>(connection)
                .optional()
                .map_err(OfferRepositoryError::persistence)?;
            row.map(Offer::try_from).transpose()
        })
        .await
    }

    async fn list_by_task(&self, task_id: TaskId) -> OfferRepositoryResult<Vec<Offer>> {
        run_blocking(&self.pool, move |connection| {
            let rows = offers::table
                .filter(offers::task_id.eq(task_id.into_inner()))
                .order(offers::created_at.desc())
                .select(OfferRow::as_select())
                .load::<OfferRow>(connection)
                .map_err(OfferRepositoryError::persistence)?;
            rows.into_iter().map(Offer::try_from).collect()
        })
        .await
    }

    async fn list_by_provider(&self, provider: UserId) -> OfferRepositoryResult<Vec<Offer>> {
        run_blocking(&self.pool, move |connection| {
            let rows = offers::table
                .filter(offers::provider_id.eq(provider.into_inner()))
                .order(offers::created_at.desc())
                .select(OfferRow::as_select())
                .load::<OfferRow>(connection)
                .map_err(OfferRepositoryError::persistence)?;
            rows.into_iter().map(Offer::try_from).collect()
        })
        .await
    }

    async fn count_by_task(&self, task_id: TaskId) -> OfferRepositoryResult<u32> {
        run_blocking(&self.pool, move |connection| {
            let count = offers::table
                .filter(offers::task_id.eq(task_id.into_inner()))
                .count()
                .get_result::<i64>(connection)
                .map_err(OfferRepositoryError::persistence)?;
            u32::try_from(count).map_err(OfferRepositoryError::persistence)
        })
        .await
    }
}

/// Writes the status of `offer` only while the stored status equals
/// `expected`, on the caller's connection.
pub(crate) fn update_offer_if_status(
    connection: &mut PgConnection,
    offer: &Offer,
    expected: OfferStatus,
) -> OfferRepositoryResult<()> {
    let offer_id = offer.id();
    let updated = diesel::update(
        offers::table
            .filter(offers::id.eq(offer_id.into_inner()))
            .filter(offers::status.eq(expected.as_str())),
    )
    .set((
        offers::status.eq(offer.status().as_str()),
        offers::updated_at.eq(offer.updated_at()),
    ))
    .execute(connection)
    .map_err(OfferRepositoryError::persistence)?;
    if updated == 1 {
        return Ok(());
    }
    Err(explain_missed_update(connection, offer_id, expected))
}

/// Distinguishes a missing row from a lost conditional write.
fn explain_missed_update(
    connection: &mut PgConnection,
    offer_id: OfferId,
    expected: OfferStatus,
) -> OfferRepositoryError {
    let current = offers::table
        .filter(offers::id.eq(offer_id.into_inner()))
        .select(offers::status)
        .first::<String>(connection)
        .optional();
    match current {
        Ok(None) => OfferRepositoryError::NotFound(offer_id),
        Ok(Some(status)) => match OfferStatus::try_from(status.as_str()) {
            Ok(actual) => OfferRepositoryError::StatusConflict {
                offer_id,
                expected,
                actual,
            },
            Err(err) => OfferRepositoryError::persistence(err),
        },
        Err(err) => OfferRepositoryError::persistence(err),
    }
}

fn is_task_provider_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_offers_task_provider_unique")
}
