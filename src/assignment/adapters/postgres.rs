//! `PostgreSQL` assignment store: one transaction per acceptance.

use async_trait::async_trait;
use diesel::Connection;
use diesel::result::Error as DieselError;

use crate::{
    assignment::{
        domain::Acceptance,
        ports::{AssignmentStore, AssignmentStoreError, AssignmentStoreResult},
    },
    booking::adapters::postgres::insert_booking,
    offer::{adapters::postgres::update_offer_if_status, domain::OfferStatus},
    postgres::{MarketplacePgPool, PersistenceFailure, run_blocking},
    task::{adapters::postgres::update_task_if_status, domain::TaskStatus},
};

impl PersistenceFailure for AssignmentStoreError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for AssignmentStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed assignment store.
#[derive(Debug, Clone)]
pub struct PostgresAssignmentStore {
    pool: MarketplacePgPool,
}

impl PostgresAssignmentStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for PostgresAssignmentStore {
    async fn commit(&self, acceptance: &Acceptance) -> AssignmentStoreResult<()> {
        let owned = acceptance.clone();
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, AssignmentStoreError, _>(|tx| {
                update_task_if_status(tx, owned.task(), TaskStatus::Open)?;
                update_offer_if_status(tx, owned.offer(), OfferStatus::Sent)?;
                insert_booking(tx, owned.booking())?;
                Ok(())
            })
        })
        .await
    }
}
