//! Shared wiring for `PostgreSQL` adapter integration tests.
//!
//! Every test gets its own database cloned from a pre-migrated template on
//! the shared embedded cluster.

use std::sync::Arc;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use rust_decimal::Decimal;
use skillmarket::{
    assignment::{adapters::postgres::PostgresAssignmentStore, services::AssignmentService},
    booking::adapters::postgres::PostgresBookingRepository,
    catalog::{
        adapters::postgres::{
            PostgresFavoriteRepository, PostgresReviewRepository, PostgresServiceRepository,
        },
        services::{CatalogService, FeedbackService},
    },
    identity::domain::{Actor, Role},
    notification::adapters::memory::InMemoryNotificationSink,
    offer::{
        adapters::postgres::PostgresOfferRepository,
        domain::Offer,
        services::{OfferService, SubmitOfferRequest},
    },
    postgres::MarketplacePgPool,
    task::{
        adapters::{media::PrefixMediaStore, memory::StaticGeocoder, postgres::PostgresTaskRepository},
        domain::{BudgetType, Coordinates, Task},
        services::{CreateTaskRequest, TaskService},
    },
};
use tokio::runtime::Runtime;

/// Boxed error returned by setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Marketplace tables, offers and bookings.
const CREATE_MARKETPLACE_SQL: &str =
    include_str!("../../migrations/2026-10-16-000000_create_marketplace_tables/up.sql");

/// Listing reviews and favorites.
const CREATE_FEEDBACK_SQL: &str =
    include_str!("../../migrations/2026-10-17-000000_create_catalog_feedback_tables/up.sql");

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "skillmarket_test_template";

/// Connections per test database; acceptance races need more than one.
const POOL_SIZE: u32 = 4;

/// Task service over `PostgreSQL` adapters.
pub type Tasks = TaskService<PostgresTaskRepository, StaticGeocoder, DefaultClock>;
/// Offer service over `PostgreSQL` adapters.
pub type Offers = OfferService<PostgresTaskRepository, PostgresOfferRepository, DefaultClock>;
/// Assignment service over `PostgreSQL` adapters.
pub type Assignments = AssignmentService<
    PostgresTaskRepository,
    PostgresOfferRepository,
    PostgresAssignmentStore,
    DefaultClock,
>;
/// Catalog service over `PostgreSQL` adapters.
pub type Catalog = CatalogService<PostgresServiceRepository, DefaultClock>;
/// Reviews and favorites over `PostgreSQL` adapters.
pub type Feedback = FeedbackService<
    PostgresServiceRepository,
    PostgresReviewRepository,
    PostgresFavoriteRepository,
    DefaultClock,
>;

/// Creates a multi-threaded runtime so racing writers really overlap.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
#[must_use]
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with every migration applied.
///
/// # Errors
///
/// Returns an error if the template cannot be created or migrated.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            execute_sql_statements(&mut conn, CREATE_MARKETPLACE_SQL)?;
            execute_sql_statements(&mut conn, CREATE_FEEDBACK_SQL)?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Runs each `;`-separated statement of a migration script.
fn execute_sql_statements(conn: &mut PgConnection, sql: &str) -> eyre::Result<()> {
    for statement in sql.split(';') {
        let trimmed = statement.trim();
        if trimmed.is_empty() || trimmed.lines().all(|line| line.trim().starts_with("--")) {
            continue;
        }
        diesel::sql_query(trimmed)
            .execute(conn)
            .map_err(|e| eyre::eyre!("SQL error: {e}\nStatement: {trimmed}"))?;
    }
    Ok(())
}

/// Drops a test database when the test ends, even on panic.
///
/// Declare the guard before anything holding the pool so the pool is
/// released first.
pub struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl CleanupGuard {
    /// Creates a guard for `db_name` on `cluster`.
    #[must_use]
    pub const fn new(cluster: &'static TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}

/// Clones the template into `db_name` and opens a pool on it.
fn create_pool(cluster: &TestCluster, db_name: &str) -> Result<MarketplacePgPool, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(ConnectionManager::<PgConnection>::new(url))
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(pool)
}

/// Every marketplace service wired to one test database.
pub struct PgMarketplace {
    /// Task lifecycle.
    pub tasks: Tasks,
    /// Bidding.
    pub offers: Offers,
    /// Offer acceptance.
    pub assignments: Arc<Assignments>,
    /// Service listings.
    pub catalog: Catalog,
    /// Listing reviews and favorites.
    pub feedback: Feedback,
    /// Raw task store.
    pub task_store: Arc<PostgresTaskRepository>,
    /// Raw offer store.
    pub offer_store: Arc<PostgresOfferRepository>,
    /// Raw booking store.
    pub booking_store: Arc<PostgresBookingRepository>,
    /// Raw assignment store, for driving commits directly.
    pub assignment_store: Arc<PostgresAssignmentStore>,
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

impl PgMarketplace {
    /// Creates `db_name` from the template and wires every adapter to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database or its pool cannot be created.
    pub fn connect(cluster: &'static TestCluster, db_name: &str) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let pool = create_pool(cluster, db_name)?;
        let task_store = Arc::new(PostgresTaskRepository::new(pool.clone()));
        let offer_store = Arc::new(PostgresOfferRepository::new(pool.clone()));
        let booking_store = Arc::new(PostgresBookingRepository::new(pool.clone()));
        let service_store = Arc::new(PostgresServiceRepository::new(pool.clone()));
        let assignment_store = Arc::new(PostgresAssignmentStore::new(pool.clone()));
        let sink = Arc::new(InMemoryNotificationSink::new());
        let clock = Arc::new(DefaultClock);

        Ok(Self {
            tasks: TaskService::new(
                Arc::clone(&task_store),
                Arc::new(StaticGeocoder::new().with_entry("Leipzig", leipzig())),
                Arc::new(PrefixMediaStore::new("https://cdn.example.test/tasks")),
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
                sink,
                Arc::clone(&clock),
            )),
            feedback: FeedbackService::new(
                Arc::clone(&service_store),
                Arc::new(PostgresReviewRepository::new(pool.clone())),
                Arc::new(PostgresFavoriteRepository::new(pool)),
                Arc::clone(&clock),
            ),
            catalog: CatalogService::new(service_store, clock),
            task_store,
            offer_store,
            booking_store,
            assignment_store,
        })
    }

    /// Posts an open fixed-budget task of 150 in Leipzig for `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task service rejects the request.
    pub async fn post_task(&self, client: &Actor) -> eyre::Result<Task> {
        Ok(self.tasks.create_task(client, task_request()).await?)
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
            .submit_offer(
                task.id(),
                &provider,
                SubmitOfferRequest::new(
                    "Can do it this weekend with my own tools.",
                    Decimal::new(price, 0),
                ),
            )
            .await?;
        Ok((provider, offer))
    }
}

/// Builds the standard loft-bed task request.
#[must_use]
pub fn task_request() -> CreateTaskRequest {
    CreateTaskRequest::new(
        "Assemble a loft bed",
        "Flat-pack loft bed, tools on site, second floor.",
        "assembly",
        "Leipzig",
        BudgetType::Fixed,
        Decimal::new(150, 0),
    )
}

/// Returns a database name unique to this test run.
#[must_use]
pub fn database_name(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}
