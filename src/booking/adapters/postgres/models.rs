//! Diesel row models for booking persistence.

use super::schema::bookings;
use crate::{
    booking::{
        domain::{
            Booking, BookingId, BookingOrigin, BookingStatus, PaymentStatus, PersistedBookingData,
        },
        ports::{BookingRepositoryError, BookingRepositoryResult},
    },
    catalog::domain::ServiceId,
    identity::domain::UserId,
    money::Money,
    task::domain::TaskId,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

/// Booking row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    /// Booking identifier.
    pub id: uuid::Uuid,
    /// Origin kind.
    pub source: String,
    /// Booked listing.
    pub service_id: Option<uuid::Uuid>,
    /// Originating task.
    pub task_id: Option<uuid::Uuid>,
    /// Paying party.
    pub customer_id: uuid::Uuid,
    /// Party doing the work.
    pub provider_id: uuid::Uuid,
    /// Price snapshot.
    pub total_price: Decimal,
    /// Lifecycle status.
    pub status: String,
    /// Payment status.
    pub payment_status: String,
    /// Agreed start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Customer note.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        let origin = booking.origin();
        Self {
            id: booking.id().into_inner(),
            source: origin.source().to_owned(),
            service_id: origin.service_id().map(ServiceId::into_inner),
            task_id: origin.task_id().map(TaskId::into_inner),
            customer_id: booking.customer().into_inner(),
            provider_id: booking.provider().into_inner(),
            total_price: booking.total_price().amount(),
            status: booking.status().as_str().to_owned(),
            payment_status: booking.payment_status().as_str().to_owned(),
            scheduled_at: booking.scheduled_at(),
            notes: booking.notes().map(str::to_owned),
            created_at: booking.created_at(),
            updated_at: booking.updated_at(),
        }
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingRepositoryError;

    fn try_from(row: BookingRow) -> BookingRepositoryResult<Self> {
        let origin = match (row.service_id, row.task_id) {
            (Some(service_id), None) => BookingOrigin::Service(ServiceId::from_uuid(service_id)),
            (None, Some(task_id)) => BookingOrigin::Task(TaskId::from_uuid(task_id)),
            _ => {
                return Err(BookingRepositoryError::persistence(std::io::Error::other(
                    format!("booking {} must reference exactly one origin", row.id),
                )));
            }
        };
        let total_price =
            Money::new(row.total_price).map_err(BookingRepositoryError::persistence)?;
        let status = BookingStatus::try_from(row.status.as_str())
            .map_err(BookingRepositoryError::persistence)?;
        let payment_status = PaymentStatus::try_from(row.payment_status.as_str())
            .map_err(BookingRepositoryError::persistence)?;
        Ok(Self::from_persisted(PersistedBookingData {
            id: BookingId::from_uuid(row.id),
            origin,
            customer: UserId::from_uuid(row.customer_id),
            provider: UserId::from_uuid(row.provider_id),
            total_price,
            status,
            payment_status,
            scheduled_at: row.scheduled_at,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}
