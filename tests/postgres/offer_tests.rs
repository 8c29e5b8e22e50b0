//! Offer rows and the one-bid-per-provider constraint on `PostgreSQL`.

use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use rust_decimal::Decimal;
use skillmarket::{
    config::OfferLimits,
    error::ErrorKind,
    identity::domain::{Actor, Role},
    offer::{
        domain::{Offer, OfferStatus, OfferTerms},
        ports::{OfferRepository, OfferRepositoryError},
        services::SubmitOfferRequest,
    },
    task::{domain::TaskId, ports::TaskRepository},
};

use super::helpers::{CleanupGuard, PgMarketplace, database_name, test_runtime};

fn offer_for(task_id: TaskId, provider: &Actor, price: i64) -> Offer {
    let terms = OfferTerms::new(
        "Can do it this weekend with my own tools.",
        Decimal::new(price, 0),
        Some("Saturday morning"),
        &OfferLimits::default(),
    )
    .expect("valid terms");
    Offer::new(task_id, provider.id(), terms, &DefaultClock)
}

#[rstest]
fn offer_row_round_trips_terms(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("offer_round_trip");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let task = rt
        .block_on(market.post_task(&Actor::fresh(Role::Customer)))
        .expect("task posted");
    let provider = Actor::fresh(Role::Provider);
    let offer = offer_for(task.id(), &provider, 140);
    rt.block_on(market.offer_store.insert(&offer))
        .expect("offer inserted");

    let stored = rt
        .block_on(market.offer_store.find_by_id(offer.id()))
        .expect("lookup")
        .expect("offer exists");
    assert_eq!(stored.terms(), offer.terms());
    assert_eq!(stored.terms().proposed_time_window(), Some("Saturday morning"));
    assert_eq!(stored.task_id(), task.id());
    assert_eq!(stored.provider(), provider.id());
    assert_eq!(stored.status(), OfferStatus::Sent);

    let by_pair = rt
        .block_on(
            market
                .offer_store
                .find_by_task_and_provider(task.id(), provider.id()),
        )
        .expect("pair lookup")
        .map(|found| found.id());
    assert_eq!(by_pair, Some(offer.id()));
}

#[rstest]
fn second_offer_from_the_same_provider_is_a_duplicate(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("offer_duplicate");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let task = rt
        .block_on(market.post_task(&Actor::fresh(Role::Customer)))
        .expect("task posted");
    let provider = Actor::fresh(Role::Provider);
    let first = offer_for(task.id(), &provider, 140);
    let second = offer_for(task.id(), &provider, 120);
    assert_ne!(first.id(), second.id());

    rt.block_on(market.offer_store.insert(&first))
        .expect("first offer");
    let err = rt
        .block_on(market.offer_store.insert(&second))
        .expect_err("same provider, same task");
    assert!(
        matches!(
            err,
            OfferRepositoryError::DuplicateOffer { task_id, provider: bidder }
                if task_id == task.id() && bidder == provider.id()
        ),
        "unexpected error: {err}"
    );
    let count = rt
        .block_on(market.offer_store.count_by_task(task.id()))
        .expect("count");
    assert_eq!(count, 1);
}

#[rstest]
fn submitted_offers_are_counted_on_the_task(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("offer_count");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let task = rt
        .block_on(market.post_task(&Actor::fresh(Role::Customer)))
        .expect("task posted");
    let (provider, _) = rt.block_on(market.bid(&task, 140)).expect("first bid");
    rt.block_on(market.bid(&task, 120)).expect("second bid");

    let err = rt
        .block_on(market.offers.submit_offer(
            task.id(),
            &provider,
            SubmitOfferRequest::new("Still keen, can also do Sunday.", Decimal::new(130, 0)),
        ))
        .expect_err("repeat bid");
    assert_eq!(err.kind(), ErrorKind::DuplicateOffer);

    let stored = rt
        .block_on(market.task_store.find_by_id(task.id()))
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.offers_count(), 2);
}
