//! Direct bookings, party-scoped reads, and post-creation status moves.

use crate::{
    booking::{
        domain::{
            Booking, BookingDomainError, BookingId, BookingOrigin, BookingStatus, NewBooking,
            PaymentStatus,
        },
        ports::{BookingRepository, BookingRepositoryError},
    },
    catalog::{
        domain::ServiceId,
        ports::{ServiceRepository, ServiceRepositoryError},
    },
    config::BookingLimits,
    error::ErrorKind,
    identity::domain::{Actor, Role, UserId},
    notification::{DomainEvent, emit_best_effort, ports::NotificationSink},
    validation::{FieldError, optional_text},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for booking a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectBookingRequest {
    scheduled_at: Option<DateTime<Utc>>,
    notes: Option<String>,
}

impl DirectBookingRequest {
    /// Creates a request with no schedule and no note.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested start.
    #[must_use]
    pub const fn with_scheduled_at(mut self, scheduled_at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    /// Sets a note for the provider.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for booking operations.
#[derive(Debug, Error)]
pub enum BookingServiceError {
    /// The booking does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// The listing to book does not exist.
    #[error("service not found: {0}")]
    ServiceNotFound(ServiceId),

    /// The actor is not a party to the booking.
    #[error("user {actor} is not a party to booking {booking_id}")]
    Forbidden {
        /// Targeted booking.
        booking_id: BookingId,
        /// Rejected actor.
        actor: UserId,
    },

    /// Validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] BookingDomainError),

    /// Booking repository operation failed.
    #[error(transparent)]
    Repository(#[from] BookingRepositoryError),

    /// Catalog repository operation failed.
    #[error(transparent)]
    Catalog(#[from] ServiceRepositoryError),
}

impl From<FieldError> for BookingServiceError {
    fn from(err: FieldError) -> Self {
        Self::Domain(BookingDomainError::Validation(err))
    }
}

impl BookingServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BookingNotFound(_)
            | Self::ServiceNotFound(_)
            | Self::Repository(BookingRepositoryError::NotFound(_))
            | Self::Catalog(ServiceRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Domain(BookingDomainError::Validation(_) | BookingDomainError::SameParty(_)) => {
                ErrorKind::ValidationFailed
            }
            Self::Domain(
                BookingDomainError::InvalidTransition { .. }
                | BookingDomainError::PaymentRegression(_),
            ) => ErrorKind::InvalidTransition,
            Self::Repository(
                BookingRepositoryError::DuplicateTaskBooking(_)
                | BookingRepositoryError::DuplicateId(_)
                | BookingRepositoryError::StatusConflict { .. }
                | BookingRepositoryError::PaymentConflict { .. },
            )
            | Self::Catalog(ServiceRepositoryError::DuplicateService(_)) => ErrorKind::Conflict,
            Self::Repository(BookingRepositoryError::Persistence(_))
            | Self::Catalog(ServiceRepositoryError::Persistence(_)) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for booking service operations.
pub type BookingServiceResult<T> = Result<T, BookingServiceError>;

/// Booking orchestration service.
#[derive(Clone)]
pub struct BookingService<B, S, C>
where
    B: BookingRepository,
    S: ServiceRepository,
    C: Clock + Send + Sync,
{
    bookings: Arc<B>,
    services: Arc<S>,
    notifications: Arc<dyn NotificationSink>,
    clock: Arc<C>,
    limits: BookingLimits,
}

impl<B, S, C> BookingService<B, S, C>
where
    B: BookingRepository,
    S: ServiceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a booking service with default field limits.
    #[must_use]
    pub fn new(
        bookings: Arc<B>,
        services: Arc<S>,
        notifications: Arc<dyn NotificationSink>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            bookings,
            services,
            notifications,
            clock,
            limits: BookingLimits::default(),
        }
    }

    /// Replaces the field limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: BookingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Books a catalog listing for `actor`.
    ///
    /// The listing price is copied into the booking; later listing edits
    /// never reach it. The booking starts `pending` and `unpaid`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingServiceError::ServiceNotFound`], a validation error
    /// for an oversized note, or [`BookingDomainError::SameParty`] when the
    /// owner books their own listing.
    pub async fn create_direct_booking(
        &self,
        service_id: ServiceId,
        actor: &Actor,
        request: DirectBookingRequest,
    ) -> BookingServiceResult<Booking> {
        let listing = self
            .services
            .find_by_id(service_id)
            .await?
            .ok_or(BookingServiceError::ServiceNotFound(service_id))?;
        let notes = optional_text("notes", request.notes.as_deref(), self.limits.max_notes_chars)?;

        let booking = Booking::new(
            NewBooking {
                origin: BookingOrigin::Service(service_id),
                customer: actor.id(),
                provider: listing.owner(),
                total_price: listing.price(),
                scheduled_at: request.scheduled_at,
                notes,
            },
            &*self.clock,
        )?;
        self.bookings.store(&booking).await?;

        tracing::info!(
            booking_id = %booking.id(),
            service_id = %service_id,
            customer = %booking.customer(),
            "booking created"
        );
        emit_best_effort(
            self.notifications.as_ref(),
            DomainEvent::BookingCreated {
                booking_id: booking.id(),
                customer: booking.customer(),
                provider: booking.provider(),
                total_price: booking.total_price(),
            },
        )
        .await;
        Ok(booking)
    }

    /// Loads a booking visible to `actor`: its parties and admins.
    ///
    /// # Errors
    ///
    /// Returns [`BookingServiceError::BookingNotFound`] or
    /// [`BookingServiceError::Forbidden`].
    pub async fn get_booking(
        &self,
        booking_id: BookingId,
        actor: &Actor,
    ) -> BookingServiceResult<Booking> {
        let booking = self.load(booking_id).await?;
        if actor.role() != Role::Admin && !booking.is_party(actor.id()) {
            tracing::debug!(booking_id = %booking_id, actor = %actor.id(), "booking hidden");
            return Err(BookingServiceError::Forbidden {
                booking_id,
                actor: actor.id(),
            });
        }
        Ok(booking)
    }

    /// Lists bookings for `actor`, newest first.
    ///
    /// Providers see the bookings they work on; everyone else sees the
    /// bookings they pay for.
    ///
    /// # Errors
    ///
    /// Returns [`BookingServiceError::Repository`] when the query fails.
    pub async fn list_bookings_for(&self, actor: &Actor) -> BookingServiceResult<Vec<Booking>> {
        let bookings = match actor.role() {
            Role::Provider => self.bookings.list_for_provider(actor.id()).await?,
            Role::Customer | Role::Admin => self.bookings.list_for_customer(actor.id()).await?,
        };
        Ok(bookings)
    }

    /// Moves a booking along its status graph on behalf of either party.
    ///
    /// # Errors
    ///
    /// Returns [`BookingServiceError::Forbidden`] for non-parties,
    /// [`BookingDomainError::InvalidTransition`] for an illegal edge, or a
    /// repository conflict when another writer moved the booking first.
    pub async fn update_status(
        &self,
        booking_id: BookingId,
        target: BookingStatus,
        actor: &Actor,
    ) -> BookingServiceResult<Booking> {
        let mut booking = self.load(booking_id).await?;
        if !booking.is_party(actor.id()) {
            tracing::debug!(booking_id = %booking_id, actor = %actor.id(), "status update rejected");
            return Err(BookingServiceError::Forbidden {
                booking_id,
                actor: actor.id(),
            });
        }

        let from = booking.status();
        booking.transition_to(target, &*self.clock)?;
        self.bookings.update_if_status(&booking, from).await?;

        tracing::info!(booking_id = %booking_id, from = %from, to = %target, "booking status changed");
        emit_best_effort(
            self.notifications.as_ref(),
            DomainEvent::BookingStatusChanged {
                booking_id,
                from,
                to: target,
            },
        )
        .await;
        Ok(booking)
    }

    /// Records a payment status reported by the payment flow.
    ///
    /// Repeating the current status is a no-op; `paid` never reverts.
    ///
    /// # Errors
    ///
    /// Returns [`BookingServiceError::BookingNotFound`] or
    /// [`BookingDomainError::PaymentRegression`].
    pub async fn set_payment_status(
        &self,
        booking_id: BookingId,
        status: PaymentStatus,
    ) -> BookingServiceResult<Booking> {
        let mut booking = self.load(booking_id).await?;
        let previous = booking.payment_status();
        if !booking.set_payment_status(status, &*self.clock)? {
            return Ok(booking);
        }
        self.bookings.update_payment_if(&booking, previous).await?;
        tracing::info!(booking_id = %booking_id, payment_status = %status, "payment recorded");
        Ok(booking)
    }

    async fn load(&self, booking_id: BookingId) -> BookingServiceResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingServiceError::BookingNotFound(booking_id))
    }
}
