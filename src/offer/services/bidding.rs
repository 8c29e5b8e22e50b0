//! Offer submission, decline, and visibility-scoped listings.

use crate::{
    config::OfferLimits,
    error::ErrorKind,
    identity::domain::{Actor, UserId},
    notification::{DomainEvent, emit_best_effort, ports::NotificationSink},
    offer::{
        domain::{Offer, OfferDomainError, OfferId, OfferStatus, OfferTerms},
        ports::{OfferRepository, OfferRepositoryError},
    },
    task::{
        domain::{Task, TaskId, TaskStatus},
        ports::{TaskRepository, TaskRepositoryError},
    },
};
use mockable::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for bidding on a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOfferRequest {
    message: String,
    proposed_price: Decimal,
    proposed_time_window: Option<String>,
}

impl SubmitOfferRequest {
    /// Creates a request with the required offer fields.
    #[must_use]
    pub fn new(message: impl Into<String>, proposed_price: Decimal) -> Self {
        Self {
            message: message.into(),
            proposed_price,
            proposed_time_window: None,
        }
    }

    /// Sets a free-text time window such as "tomorrow morning".
    #[must_use]
    pub fn with_time_window(mut self, window: impl Into<String>) -> Self {
        self.proposed_time_window = Some(window.into());
        self
    }
}

/// Service-level errors for offer operations.
#[derive(Debug, Error)]
pub enum OfferServiceError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The offer does not exist.
    #[error("offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The task no longer accepts offers.
    #[error("task {task_id} is {status}, not open")]
    TaskNotOpen {
        /// Targeted task.
        task_id: TaskId,
        /// Current status.
        status: TaskStatus,
    },

    /// The task owner tried to bid on their own task.
    #[error("user {provider} owns task {task_id}")]
    SelfOffer {
        /// Targeted task.
        task_id: TaskId,
        /// Owner who tried to bid.
        provider: UserId,
    },

    /// The provider already has an offer on the task.
    #[error("provider {provider} already has offer on task {task_id}")]
    DuplicateOffer {
        /// Targeted task.
        task_id: TaskId,
        /// Bidding provider.
        provider: UserId,
    },

    /// Only the task owner may decide on offers.
    #[error("user {actor} may not decide offer {offer_id}")]
    Forbidden {
        /// Offer the actor tried to decide.
        offer_id: OfferId,
        /// Rejected actor.
        actor: UserId,
    },

    /// Validation failed or the offer was already decided.
    #[error(transparent)]
    Domain(#[from] OfferDomainError),

    /// Offer repository operation failed.
    #[error(transparent)]
    OfferRepository(#[from] OfferRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

impl OfferServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_)
            | Self::OfferNotFound(_)
            | Self::OfferRepository(OfferRepositoryError::NotFound(_))
            | Self::TaskRepository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::TaskNotOpen { .. } => ErrorKind::TaskNotOpen,
            Self::SelfOffer { .. } => ErrorKind::SelfOfferForbidden,
            Self::DuplicateOffer { .. }
            | Self::OfferRepository(OfferRepositoryError::DuplicateOffer { .. }) => {
                ErrorKind::DuplicateOffer
            }
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Domain(OfferDomainError::Validation(_)) => ErrorKind::ValidationFailed,
            Self::Domain(OfferDomainError::AlreadyDecided { .. })
            | Self::OfferRepository(OfferRepositoryError::StatusConflict { .. }) => {
                ErrorKind::OfferAlreadyDecided
            }
            Self::OfferRepository(OfferRepositoryError::DuplicateId(_))
            | Self::TaskRepository(
                TaskRepositoryError::DuplicateTask(_)
                | TaskRepositoryError::StatusConflict { .. }
                | TaskRepositoryError::StaleWrite { .. },
            ) => ErrorKind::Conflict,
            Self::OfferRepository(OfferRepositoryError::Persistence(_))
            | Self::TaskRepository(TaskRepositoryError::Persistence(_)) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for offer service operations.
pub type OfferServiceResult<T> = Result<T, OfferServiceError>;

/// Offer orchestration service.
#[derive(Clone)]
pub struct OfferService<T, O, C>
where
    T: TaskRepository,
    O: OfferRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    offers: Arc<O>,
    notifications: Arc<dyn NotificationSink>,
    clock: Arc<C>,
    limits: OfferLimits,
}

impl<T, O, C> OfferService<T, O, C>
where
    T: TaskRepository,
    O: OfferRepository,
    C: Clock + Send + Sync,
{
    /// Creates an offer service with default field limits.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        offers: Arc<O>,
        notifications: Arc<dyn NotificationSink>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            offers,
            notifications,
            clock,
            limits: OfferLimits::default(),
        }
    }

    /// Replaces the field limits.
    #[must_use]
    pub fn with_limits(mut self, limits: OfferLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Submits `actor`'s bid on an open task.
    ///
    /// Preconditions are checked in order and the first failure wins: the
    /// task exists, is open, is not owned by `actor`, has no offer from
    /// `actor`, and the content is within bounds. The offer counter is
    /// bumped best effort afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError::TaskNotFound`],
    /// [`OfferServiceError::TaskNotOpen`], [`OfferServiceError::SelfOffer`],
    /// [`OfferServiceError::DuplicateOffer`], or a validation error.
    pub async fn submit_offer(
        &self,
        task_id: TaskId,
        actor: &Actor,
        request: SubmitOfferRequest,
    ) -> OfferServiceResult<Offer> {
        let provider = actor.id();
        let task = self.load_task(task_id).await?;
        if task.status() != TaskStatus::Open {
            tracing::debug!(task_id = %task_id, status = %task.status(), "offer on closed task");
            return Err(OfferServiceError::TaskNotOpen {
                task_id,
                status: task.status(),
            });
        }
        if task.is_owned_by(provider) {
            tracing::debug!(task_id = %task_id, "offer on own task");
            return Err(OfferServiceError::SelfOffer { task_id, provider });
        }
        if self
            .offers
            .find_by_task_and_provider(task_id, provider)
            .await?
            .is_some()
        {
            tracing::debug!(task_id = %task_id, provider = %provider, "duplicate offer");
            return Err(OfferServiceError::DuplicateOffer { task_id, provider });
        }

        let terms = OfferTerms::new(
            &request.message,
            request.proposed_price,
            request.proposed_time_window.as_deref(),
            &self.limits,
        )?;
        let offer = Offer::new(task_id, provider, terms, &*self.clock);
        self.offers.insert(&offer).await.map_err(|err| match err {
            OfferRepositoryError::DuplicateOffer { .. } => {
                OfferServiceError::DuplicateOffer { task_id, provider }
            }
            other => OfferServiceError::OfferRepository(other),
        })?;

        if let Err(err) = self.tasks.increment_offers_count(task_id).await {
            tracing::warn!(task_id = %task_id, error = %err, "offer counter not incremented");
        }
        tracing::info!(
            offer_id = %offer.id(),
            task_id = %task_id,
            provider = %provider,
            "offer submitted"
        );
        emit_best_effort(
            self.notifications.as_ref(),
            DomainEvent::OfferCreated {
                offer_id: offer.id(),
                task_id,
                client: task.client(),
                provider,
                proposed_price: offer.terms().proposed_price(),
            },
        )
        .await;
        Ok(offer)
    }

    /// Declines a sent offer on behalf of the task owner.
    ///
    /// Only the offer changes; the task and any booking are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError::OfferNotFound`],
    /// [`OfferDomainError::AlreadyDecided`] when the offer left `sent`, or
    /// [`OfferServiceError::Forbidden`] for anyone but the task owner. The
    /// status is checked first.
    pub async fn decline_offer(&self, offer_id: OfferId, actor: &Actor) -> OfferServiceResult<Offer> {
        let mut offer = self
            .offers
            .find_by_id(offer_id)
            .await?
            .ok_or(OfferServiceError::OfferNotFound(offer_id))?;
        if offer.status() != OfferStatus::Sent {
            return Err(OfferDomainError::AlreadyDecided {
                offer_id,
                status: offer.status(),
            }
            .into());
        }
        let task = self.load_task(offer.task_id()).await?;
        if !task.is_owned_by(actor.id()) {
            tracing::debug!(offer_id = %offer_id, actor = %actor.id(), "decline rejected");
            return Err(OfferServiceError::Forbidden {
                offer_id,
                actor: actor.id(),
            });
        }

        offer.decline(&*self.clock)?;
        self.offers
            .update_if_status(&offer, OfferStatus::Sent)
            .await?;
        tracing::info!(offer_id = %offer_id, task_id = %offer.task_id(), "offer declined");
        emit_best_effort(
            self.notifications.as_ref(),
            DomainEvent::OfferDeclined {
                offer_id,
                task_id: offer.task_id(),
                provider: offer.provider(),
            },
        )
        .await;
        Ok(offer)
    }

    /// Lists offers on a task, newest first.
    ///
    /// The task owner sees every offer; anyone else only their own.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn list_offers_for_task(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> OfferServiceResult<Vec<Offer>> {
        let task = self.load_task(task_id).await?;
        let offers = self.offers.list_by_task(task_id).await?;
        if task.is_owned_by(actor.id()) {
            return Ok(offers);
        }
        Ok(offers
            .into_iter()
            .filter(|offer| offer.provider() == actor.id())
            .collect())
    }

    /// Lists the offers `actor` has written, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError::OfferRepository`] when the query fails.
    pub async fn list_offers_for_provider(&self, actor: &Actor) -> OfferServiceResult<Vec<Offer>> {
        Ok(self.offers.list_by_provider(actor.id()).await?)
    }

    /// Recomputes a task's offer counter from the offer store.
    ///
    /// # Errors
    ///
    /// Returns [`OfferServiceError::TaskNotFound`] when the task does not
    /// exist, or a repository error.
    pub async fn recount_offers(&self, task_id: TaskId) -> OfferServiceResult<u32> {
        let task = self.load_task(task_id).await?;
        let count = self.offers.count_by_task(task_id).await?;
        if count != task.offers_count() {
            tracing::info!(
                task_id = %task_id,
                stored = task.offers_count(),
                actual = count,
                "offer counter repaired"
            );
            self.tasks.set_offers_count(task_id, count).await?;
        }
        Ok(count)
    }

    async fn load_task(&self, task_id: TaskId) -> OfferServiceResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(OfferServiceError::TaskNotFound(task_id))
    }
}
