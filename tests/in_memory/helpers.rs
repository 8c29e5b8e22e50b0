//! Shared wiring for in-memory marketplace integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use rust_decimal::Decimal;
use skillmarket::{
    assignment::{adapters::memory::InMemoryAssignmentStore, services::AssignmentService},
    booking::{adapters::memory::InMemoryBookingRepository, services::BookingService},
    catalog::{
        adapters::memory::{
            InMemoryFavoriteRepository, InMemoryReviewRepository, InMemoryServiceRepository,
        },
        services::{CatalogService, FeedbackService},
    },
    identity::domain::{Actor, Role},
    notification::adapters::memory::InMemoryNotificationSink,
    offer::{
        adapters::memory::InMemoryOfferRepository,
        domain::Offer,
        services::{OfferService, SubmitOfferRequest},
    },
    task::{
        adapters::{
            media::PrefixMediaStore,
            memory::{InMemoryTaskRepository, StaticGeocoder},
        },
        domain::{BudgetType, Coordinates, Task},
        services::{CreateTaskRequest, TaskService},
    },
};

/// Task service over in-memory adapters.
pub type Tasks = TaskService<InMemoryTaskRepository, StaticGeocoder, DefaultClock>;
/// Offer service over in-memory adapters.
pub type Offers = OfferService<InMemoryTaskRepository, InMemoryOfferRepository, DefaultClock>;
/// Assignment service over in-memory adapters.
pub type Assignments = AssignmentService<
    InMemoryTaskRepository,
    InMemoryOfferRepository,
    InMemoryAssignmentStore,
    DefaultClock,
>;
/// Booking service over in-memory adapters.
pub type Bookings =
    BookingService<InMemoryBookingRepository, InMemoryServiceRepository, DefaultClock>;
/// Catalog service over in-memory adapters.
pub type Catalog = CatalogService<InMemoryServiceRepository, DefaultClock>;
/// Reviews and favorites over in-memory adapters.
pub type Feedback = FeedbackService<
    InMemoryServiceRepository,
    InMemoryReviewRepository,
    InMemoryFavoriteRepository,
    DefaultClock,
>;

/// Every marketplace service wired to shared in-memory state.
pub struct Marketplace {
    /// Task lifecycle.
    pub tasks: Tasks,
    /// Bidding.
    pub offers: Offers,
    /// Offer acceptance.
    pub assignments: Arc<Assignments>,
    /// Bookings.
    pub bookings: Bookings,
    /// Service listings.
    pub catalog: Catalog,
    /// Listing reviews and favorites.
    pub feedback: Feedback,
    /// Raw assignment store, for driving commits directly.
    pub assignment_store: Arc<InMemoryAssignmentStore>,
    /// Raw booking store, for assertions the services do not expose.
    pub booking_store: Arc<InMemoryBookingRepository>,
    /// Recorded events.
    pub sink: Arc<InMemoryNotificationSink>,
}

/// Leipzig city centre, the only location the test geocoder knows.
///
/// # Panics
///
/// Never; the literal coordinates are in range.
#[must_use]
pub fn leipzig() -> Coordinates {
    Coordinates::new(51.34, 12.375).expect("valid coordinates")
}

/// Wires a marketplace with empty stores.
#[fixture]
pub fn marketplace() -> Marketplace {
    let task_store = Arc::new(InMemoryTaskRepository::new());
    let offer_store = Arc::new(InMemoryOfferRepository::new());
    let booking_store = Arc::new(InMemoryBookingRepository::new());
    let service_store = Arc::new(InMemoryServiceRepository::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let clock = Arc::new(DefaultClock);
    let geocoder = Arc::new(StaticGeocoder::new().with_entry("Leipzig", leipzig()));

    let assignment_store = Arc::new(InMemoryAssignmentStore::new(
        &task_store,
        &offer_store,
        &booking_store,
    ));
    Marketplace {
        tasks: TaskService::new(
            Arc::clone(&task_store),
            geocoder,
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
            Arc::clone(&task_store),
            Arc::clone(&offer_store),
            Arc::clone(&assignment_store),
            sink.clone(),
            Arc::clone(&clock),
        )),
        bookings: BookingService::new(
            Arc::clone(&booking_store),
            Arc::clone(&service_store),
            sink.clone(),
            Arc::clone(&clock),
        ),
        feedback: FeedbackService::new(
            Arc::clone(&service_store),
            Arc::new(InMemoryReviewRepository::new()),
            Arc::new(InMemoryFavoriteRepository::new()),
            Arc::clone(&clock),
        ),
        catalog: CatalogService::new(service_store, clock),
        assignment_store,
        booking_store,
        sink,
    }
}

impl Marketplace {
    /// Posts an open fixed-budget task of 150 in Leipzig for `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task service rejects the request.
    pub async fn post_task(&self, client: &Actor) -> eyre::Result<Task> {
        let request = CreateTaskRequest::new(
            "Assemble a loft bed",
            "Flat-pack loft bed, tools on site, second floor.",
            "assembly",
            "Leipzig",
            BudgetType::Fixed,
            Decimal::new(150, 0),
        );
        Ok(self.tasks.create_task(client, request).await?)
    }

    /// Submits a bid at `price` from a fresh provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the offer service rejects the bid.
    pub async fn bid(&self, task: &Task, price: i64) -> eyre::Result<(Actor, Offer)> {
        let provider = Actor::fresh(Role::Provider);
        let offer = self
            .offers
            .submit_offer(task.id(), &provider, offer_request(price))
            .await?;
        Ok((provider, offer))
    }
}

/// Builds a valid offer request at `price`.
#[must_use]
pub fn offer_request(price: i64) -> SubmitOfferRequest {
    SubmitOfferRequest::new("Can do it this weekend with my own tools.", Decimal::new(price, 0))
}
