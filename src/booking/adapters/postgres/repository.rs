//! `PostgreSQL` repository implementation for bookings.

use super::{models::BookingRow, schema::bookings};
use crate::{
    booking::{
        domain::{Booking, BookingId, BookingStatus, PaymentStatus},
        ports::{BookingRepository, BookingRepositoryError, BookingRepositoryResult},
    },
    identity::domain::UserId,
    postgres::{MarketplacePgPool, PersistenceFailure, run_blocking},
    task::domain::TaskId,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for BookingRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed booking repository.
#[derive(Debug, Clone)]
pub struct PostgresBookingRepository {
    pool: MarketplacePgPool,
}

impl PostgresBookingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn store(&self, booking: &Booking) -> BookingRepositoryResult<()> {
        let owned = booking.clone();
        run_blocking(&self.pool, move |connection| insert_booking(connection, &owned)).await
    }

    async fn find_by_id(&self, id: BookingId) -> BookingRepositoryResult<Option<Booking>> {
        run_blocking(&self.pool, move |connection| {
            let row = bookings::table
                .filter(bookings::id.eq(id.into_inner()))
                .select(BookingRow::as_select())
                .first::<BookingRow>(connection)
                .optional()
                .map_err(BookingRepositoryError::persistence)?;
            row.map(Booking::try_from).transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> BookingRepositoryResult<Option<Booking>> {
        run_blocking(&self.pool, move |connection| {
            let row = bookings::table
                .filter(bookings::task_id.eq(task_id.into_inner()))
                .select(BookingRow::as_select())
                .first::<BookingRow>(connection)
                .optional()
                .map_err(BookingRepositoryError::persistence)?;
            row.map(Booking::try_from).transpose()
        })
        .await
    }

    async fn list_for_customer(&self, customer: UserId) -> BookingRepositoryResult<Vec<Booking>> {
        run_blocking(&self.pool, move |connection| {
            let rows = bookings::table
                .filter(bookings::customer_id.eq(customer.into_inner()))
                .order(bookings::created_at.desc())
                .select(BookingRow::as_select())
                .load::<BookingRow>(connection)
                .map_err(BookingRepositoryError::persistence)?;
            rows.into_iter().map(Booking::try_from).collect()
        })
        .await
    }

    async fn list_for_provider(&self, provider: UserId) -> BookingRepositoryResult<Vec<Booking>> {
        run_blocking(&self.pool, move |connection| {
            let rows = bookings::table
                .filter(bookings::provider_id.eq(provider.into_inner()))
                .order(bookings::created_at.desc())
                .select(BookingRow::as_select())
                .load::<BookingRow>(connection)
                .map_err(BookingRepositoryError::persistence)?;
            rows.into_iter().map(Booking::try_from).collect()
        })
        .await
    }

    async fn update_if_status(
        &self,
        booking: &Booking,
        expected: BookingStatus,
    ) -> BookingRepositoryResult<()> {
        let booking_id = booking.id();
        let status = booking.status().as_str();
        let updated_at = booking.updated_at();

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                bookings::table
                    .filter(bookings::id.eq(booking_id.into_inner()))
                    .filter(bookings::status.eq(expected.as_str())),
            )
            .set((
                bookings::status.eq(status),
                bookings::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(BookingRepositoryError::persistence)?;
            if updated == 1 {
                return Ok(());
            }
            let (actual, _) = current_statuses(connection, booking_id)?;
            Err(BookingRepositoryError::StatusConflict {
                booking_id,
                expected,
                actual: BookingStatus::try_from(actual.as_str())
                    .map_err(BookingRepositoryError::persistence)?,
            })
        })
        .await
    }

    async fn update_payment_if(
        &self,
        booking: &Booking,
        expected: PaymentStatus,
    ) -> BookingRepositoryResult<()> {
        let booking_id = booking.id();
        let payment_status = booking.payment_status().as_str();
        let updated_at = booking.updated_at();

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                bookings::table
                    .filter(bookings::id.eq(booking_id.into_inner()))
                    .filter(bookings::payment_status.eq(expected.as_str())),
            )
            .set((
                bookings::payment_status.eq(payment_status),
                bookings::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(BookingRepositoryError::persistence)?;
            if updated == 1 {
                return Ok(());
            }
            let (_, actual) = current_statuses(connection, booking_id)?;
            Err(BookingRepositoryError::PaymentConflict {
                booking_id,
                expected,
                actual: PaymentStatus::try_from(actual.as_str())
                    .map_err(BookingRepositoryError::persistence)?,
            })
        })
        .await
    }
}

/// Inserts a booking on an existing connection, inside a caller's
/// transaction when there is one.
pub(crate) fn insert_booking(
    connection: &mut PgConnection,
    booking: &Booking,
) -> BookingRepositoryResult<()> {
    let booking_id = booking.id();
    let task_id = booking.origin().task_id();
    let row = BookingRow::from(booking);
    diesel::insert_into(bookings::table)
        .values(&row)
        .execute(connection)
        .map_err(|err| match (err, task_id) {
            (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info), Some(id))
                if is_task_unique_violation(info.as_ref()) =>
            {
                BookingRepositoryError::DuplicateTaskBooking(id)
            }
            (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), _) => {
                BookingRepositoryError::DuplicateId(booking_id)
            }
            (other, _) => BookingRepositoryError::persistence(other),
        })?;
    Ok(())
}

/// Reads the lifecycle and payment statuses after a missed conditional
/// update.
fn current_statuses(
    connection: &mut PgConnection,
    booking_id: BookingId,
) -> BookingRepositoryResult<(String, String)> {
    bookings::table
        .filter(bookings::id.eq(booking_id.into_inner()))
        .select((bookings::status, bookings::payment_status))
        .first::<(String, String)>(connection)
        .optional()
        .map_err(BookingRepositoryError::persistence)?
        .ok_or(BookingRepositoryError::NotFound(booking_id))
}

fn is_task_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_bookings_task_unique")
}
