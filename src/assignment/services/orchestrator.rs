//! Offer acceptance orchestration.

use crate::{
    assignment::{
        domain::{Acceptance, AssignmentDomainError},
        ports::{AssignmentStore, AssignmentStoreError},
    },
    booking::ports::BookingRepositoryError,
    error::ErrorKind,
    identity::domain::{Actor, UserId},
    notification::{DomainEvent, emit_best_effort, ports::NotificationSink},
    offer::{
        domain::{Offer, OfferId, OfferStatus},
        ports::{OfferRepository, OfferRepositoryError},
    },
    task::{
        domain::{TaskId, TaskStatus},
        ports::{TaskRepository, TaskRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`AssignmentService::accept_offer`].
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The offer does not exist or targets another task.
    #[error("offer {offer_id} not found on task {task_id}")]
    OfferNotFound {
        /// Task named by the caller.
        task_id: TaskId,
        /// Offer named by the caller.
        offer_id: OfferId,
    },

    /// Only the task owner may accept offers.
    #[error("user {actor} does not own task {task_id}")]
    Forbidden {
        /// Targeted task.
        task_id: TaskId,
        /// Rejected actor.
        actor: UserId,
    },

    /// The task is no longer open.
    #[error("task {task_id} is {status}, not open")]
    TaskNotOpen {
        /// Targeted task.
        task_id: TaskId,
        /// Status observed when the request was rejected.
        status: TaskStatus,
    },

    /// The offer was already accepted or declined.
    #[error("offer {offer_id} is already {status}")]
    OfferAlreadyDecided {
        /// Targeted offer.
        offer_id: OfferId,
        /// Status observed when the request was rejected.
        status: OfferStatus,
    },

    /// An aggregate rule refused the acceptance.
    #[error(transparent)]
    Domain(#[from] AssignmentDomainError),

    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),

    /// Offer lookup failed.
    #[error(transparent)]
    OfferRepository(#[from] OfferRepositoryError),

    /// The commit failed and nothing was written.
    #[error(transparent)]
    Store(AssignmentStoreError),
}

impl AssignmentError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_)
            | Self::OfferNotFound { .. }
            | Self::Domain(AssignmentDomainError::OfferTaskMismatch { .. })
            | Self::TaskRepository(TaskRepositoryError::NotFound(_))
            | Self::OfferRepository(OfferRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::TaskNotOpen { .. } => ErrorKind::TaskNotOpen,
            Self::OfferAlreadyDecided { .. } => ErrorKind::OfferAlreadyDecided,
            Self::TaskRepository(TaskRepositoryError::Persistence(_))
            | Self::OfferRepository(OfferRepositoryError::Persistence(_))
            | Self::Store(
                AssignmentStoreError::Persistence(_)
                | AssignmentStoreError::Task(TaskRepositoryError::Persistence(_))
                | AssignmentStoreError::Offer(OfferRepositoryError::Persistence(_))
                | AssignmentStoreError::Booking(BookingRepositoryError::Persistence(_)),
            ) => ErrorKind::Unavailable,
            Self::Domain(_) | Self::TaskRepository(_) | Self::OfferRepository(_) | Self::Store(_) => {
                ErrorKind::Conflict
            }
        }
    }

    /// Translates a failed commit into the error the losing caller sees.
    ///
    /// A lost task write means another acceptance won the race; a lost offer
    /// write means the offer was decided meanwhile.
    fn from_commit(err: AssignmentStoreError) -> Self {
        match err {
            AssignmentStoreError::Task(TaskRepositoryError::StatusConflict {
                task_id,
                actual,
                ..
            }) => Self::TaskNotOpen {
                task_id,
                status: actual,
            },
            AssignmentStoreError::Offer(OfferRepositoryError::StatusConflict {
                offer_id,
                actual,
                ..
            }) => Self::OfferAlreadyDecided {
                offer_id,
                status: actual,
            },
            other => Self::Store(other),
        }
    }
}

/// Result type for assignment operations.
pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// The Assignment Orchestrator.
#[derive(Clone)]
pub struct AssignmentService<T, O, A, C>
where
    T: TaskRepository,
    O: OfferRepository,
    A: AssignmentStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    offers: Arc<O>,
    store: Arc<A>,
    notifications: Arc<dyn NotificationSink>,
    clock: Arc<C>,
}

impl<T, O, A, C> AssignmentService<T, O, A, C>
where
    T: TaskRepository,
    O: OfferRepository,
    A: AssignmentStore,
    C: Clock + Send + Sync,
{
    /// Creates an assignment service.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        offers: Arc<O>,
        store: Arc<A>,
        notifications: Arc<dyn NotificationSink>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            offers,
            store,
            notifications,
            clock,
        }
    }

    /// Accepts `offer_id` on behalf of the owner of `task_id`.
    ///
    /// Preconditions are checked in order and the first failure wins: the
    /// task exists, `actor` owns it, the offer exists on it, the task is
    /// open, and the offer is still sent. The assigned task, accepted offer
    /// and confirmed booking are then committed as one unit. Other offers on
    /// the task stay `sent`.
    ///
    /// Of two concurrent acceptances on the same task exactly one commits;
    /// the other gets [`AssignmentError::TaskNotOpen`].
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition, or the commit failure mapped
    /// through the race rules above. Nothing is written on error.
    pub async fn accept_offer(
        &self,
        task_id: TaskId,
        offer_id: OfferId,
        actor: &Actor,
    ) -> AssignmentResult<Acceptance> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(AssignmentError::TaskNotFound(task_id))?;
        if !task.is_owned_by(actor.id()) {
            tracing::debug!(task_id = %task_id, actor = %actor.id(), "acceptance by non-owner");
            return Err(AssignmentError::Forbidden {
                task_id,
                actor: actor.id(),
            });
        }
        let offer = self.load_offer(task_id, offer_id).await?;
        if task.status() != TaskStatus::Open {
            tracing::debug!(task_id = %task_id, status = %task.status(), "acceptance on closed task");
            return Err(AssignmentError::TaskNotOpen {
                task_id,
                status: task.status(),
            });
        }
        if offer.status() != OfferStatus::Sent {
            tracing::debug!(offer_id = %offer_id, status = %offer.status(), "offer already decided");
            return Err(AssignmentError::OfferAlreadyDecided {
                offer_id,
                status: offer.status(),
            });
        }

        let acceptance = Acceptance::prepare(task, offer, &*self.clock)?;
        self.store.commit(&acceptance).await.map_err(|err| {
            tracing::debug!(task_id = %task_id, offer_id = %offer_id, error = %err, "acceptance commit lost");
            AssignmentError::from_commit(err)
        })?;

        let booking = acceptance.booking();
        tracing::info!(
            task_id = %task_id,
            offer_id = %offer_id,
            provider = %booking.provider(),
            booking_id = %booking.id(),
            "offer accepted"
        );
        emit_best_effort(
            self.notifications.as_ref(),
            DomainEvent::TaskAssigned {
                task_id,
                offer_id,
                client: booking.customer(),
                provider: booking.provider(),
                booking_id: booking.id(),
            },
        )
        .await;
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
        Ok(acceptance)
    }

    async fn load_offer(&self, task_id: TaskId, offer_id: OfferId) -> AssignmentResult<Offer> {
        self.offers
            .find_by_id(offer_id)
            .await?
            .filter(|offer| offer.task_id() == task_id)
            .ok_or(AssignmentError::OfferNotFound { task_id, offer_id })
    }
}
