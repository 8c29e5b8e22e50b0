//! Shared world state for offer acceptance BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use rust_decimal::Decimal;
use skillmarket::{
    assignment::{
        adapters::memory::InMemoryAssignmentStore,
        domain::Acceptance,
        services::{AssignmentError, AssignmentService},
    },
    booking::adapters::memory::InMemoryBookingRepository,
    identity::domain::{Actor, Role},
    notification::adapters::memory::InMemoryNotificationSink,
    offer::{
        adapters::memory::InMemoryOfferRepository,
        domain::Offer,
        services::{OfferService, OfferServiceError, SubmitOfferRequest},
    },
    task::{
        adapters::{
            media::PrefixMediaStore,
            memory::{InMemoryTaskRepository, StaticGeocoder},
        },
        domain::{BudgetType, Task},
        services::{CreateTaskRequest, TaskService},
    },
};

/// Task service used by the BDD world.
pub type TestTaskService = TaskService<InMemoryTaskRepository, StaticGeocoder, DefaultClock>;
/// Offer service used by the BDD world.
pub type TestOfferService =
    OfferService<InMemoryTaskRepository, InMemoryOfferRepository, DefaultClock>;
/// Assignment service used by the BDD world.
pub type TestAssignmentService = AssignmentService<
    InMemoryTaskRepository,
    InMemoryOfferRepository,
    InMemoryAssignmentStore,
    DefaultClock,
>;

/// Scenario world for offer acceptance behaviour tests.
pub struct AcceptanceWorld {
    pub tasks: TestTaskService,
    pub offers: TestOfferService,
    pub assignments: Arc<TestAssignmentService>,
    pub bookings: Arc<InMemoryBookingRepository>,
    pub client: Actor,
    pub task: Option<Task>,
    pub bids: Vec<(Actor, Offer)>,
    pub foreign_offer: Option<Offer>,
    pub last_result: Option<Result<Acceptance, AssignmentError>>,
    pub concurrent_results: Vec<Result<Acceptance, AssignmentError>>,
    pub last_submission: Option<Result<Offer, OfferServiceError>>,
}

impl AcceptanceWorld {
    /// Creates a world with empty stores and a fresh client.
    #[must_use]
    pub fn new() -> Self {
        let task_store = Arc::new(InMemoryTaskRepository::new());
        let offer_store = Arc::new(InMemoryOfferRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let sink = Arc::new(InMemoryNotificationSink::new());
        let clock = Arc::new(DefaultClock);
        let store = Arc::new(InMemoryAssignmentStore::new(
            &task_store,
            &offer_store,
            &bookings,
        ));

        Self {
            tasks: TaskService::new(
                Arc::clone(&task_store),
                Arc::new(StaticGeocoder::new()),
                Arc::new(PrefixMediaStore::default()),
                sink.clone(),
                Arc::clone(&clock),
            ),
            offers: OfferService::new(
                Arc::clone(&task_store),
                Arc::clone(&offer_store),
                sink.clone(),
                Arc::clone(&clock),
            ),
            assignments: Arc::new(AssignmentService::new(
                task_store,
                offer_store,
                store,
                sink,
                clock,
            )),
            bookings,
            client: Actor::fresh(Role::Customer),
            task: None,
            bids: Vec::new(),
            foreign_offer: None,
            last_result: None,
            concurrent_results: Vec::new(),
            last_submission: None,
        }
    }

    /// Posts a fixed-budget task for the world's client.
    ///
    /// # Errors
    ///
    /// Returns an error if the task service rejects the request.
    pub async fn post_task(&self) -> eyre::Result<Task> {
        let request = CreateTaskRequest::new(
            "Move a sofa upstairs",
            "Three-seater, narrow stairwell, third floor.",
            "moving",
            "Dresden",
            BudgetType::Fixed,
            Decimal::new(150, 0),
        );
        Ok(self.tasks.create_task(&self.client, request).await?)
    }

    /// Returns the scenario's main task.
    ///
    /// # Errors
    ///
    /// Returns an error when the background step has not run.
    pub fn task(&self) -> eyre::Result<&Task> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the bid at `position`, counted from one.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer bids were placed.
    pub fn bid(&self, position: usize) -> eyre::Result<&(Actor, Offer)> {
        position
            .checked_sub(1)
            .and_then(|index| self.bids.get(index))
            .ok_or_else(|| eyre::eyre!("missing bid {position} in scenario world"))
    }
}

impl Default for AcceptanceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AcceptanceWorld {
    AcceptanceWorld::default()
}

/// Builds a bid request at `price`.
#[must_use]
pub fn bid_request(price: i64) -> SubmitOfferRequest {
    SubmitOfferRequest::new("Available tomorrow morning.", Decimal::new(price, 0))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
