//! Diesel row models for offer persistence.

use super::schema::offers;
use crate::{
    identity::domain::UserId,
    money::Money,
    offer::{
        domain::{Offer, OfferId, OfferStatus, OfferTerms, PersistedOfferData},
        ports::{OfferRepositoryError, OfferRepositoryResult},
    },
    task::domain::TaskId,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

/// Offer row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OfferRow {
    /// Offer identifier.
    pub id: uuid::Uuid,
    /// Targeted task.
    pub task_id: uuid::Uuid,
    /// Bidding provider.
    pub provider_id: uuid::Uuid,
    /// Message to the task owner.
    pub message: String,
    /// Proposed price.
    pub proposed_price: Decimal,
    /// Proposed time window.
    pub proposed_time_window: Option<String>,
    /// Offer status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Offer> for OfferRow {
    fn from(offer: &Offer) -> Self {
        let terms = offer.terms();
        Self {
            id: offer.id().into_inner(),
            task_id: offer.task_id().into_inner(),
            provider_id: offer.provider().into_inner(),
            message: terms.message().to_owned(),
            proposed_price: terms.proposed_price().amount(),
            proposed_time_window: terms.proposed_time_window().map(str::to_owned),
            status: offer.status().as_str().to_owned(),
            created_at: offer.created_at(),
            updated_at: offer.updated_at(),
        }
    }
}

impl TryFrom<OfferRow> for Offer {
    type Error = OfferRepositoryError;

    fn try_from(row: OfferRow) -> OfferRepositoryResult<Self> {
        let price = Money::new(row.proposed_price).map_err(OfferRepositoryError::persistence)?;
        let status =
            OfferStatus::try_from(row.status.as_str()).map_err(OfferRepositoryError::persistence)?;
        Ok(Self::from_persisted(PersistedOfferData {
            id: OfferId::from_uuid(row.id),
            task_id: TaskId::from_uuid(row.task_id),
            provider: UserId::from_uuid(row.provider_id),
            terms: OfferTerms::from_persisted(row.message, price, row.proposed_time_window),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}
