//! Listings, reviews and favorites on `PostgreSQL`.

use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use rust_decimal::Decimal;
use skillmarket::{
    catalog::{
        domain::{ServiceFilter, ServiceId},
        services::{CreateReviewRequest, CreateServiceRequest},
    },
    error::ErrorKind,
    identity::domain::{Actor, Role},
};

use super::helpers::{CleanupGuard, PgMarketplace, database_name, test_runtime};

fn listing(title: &str, price: i64) -> CreateServiceRequest {
    CreateServiceRequest::new(
        title,
        "Careful work, references on request.",
        "outdoor",
        Decimal::new(price, 0),
    )
}

#[rstest]
fn listing_row_round_trips_tags_and_price(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("listing_round_trip");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let provider = Actor::fresh(Role::Provider);
    let created = rt
        .block_on(market.catalog.create_service(
            &provider,
            listing("Gutter cleaning", 60).with_tags(["ladder".to_owned(), "roof".to_owned()]),
        ))
        .expect("listing published");

    let stored = rt
        .block_on(market.catalog.get_service(created.id()))
        .expect("listing lookup");
    assert_eq!(stored.owner(), provider.id());
    assert_eq!(stored.title(), "Gutter cleaning");
    assert_eq!(stored.tags(), created.tags());
    assert_eq!(stored.price(), created.price());

    let found = rt
        .block_on(
            market
                .catalog
                .list_services(&ServiceFilter::new().with_text("gutter")),
        )
        .expect("text search");
    let ids: Vec<_> = found.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec![created.id()]);
}

#[rstest]
fn reviews_are_listed_newest_first(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("reviews");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let published = rt
        .block_on(
            market
                .catalog
                .create_service(&Actor::fresh(Role::Provider), listing("Hedge trimming", 90)),
        )
        .expect("listing published");
    for (stars, text) in [(4, "Good, a little late."), (5, "Spotless.")] {
        rt.block_on(market.feedback.create_review(
            published.id(),
            &Actor::fresh(Role::Customer),
            CreateReviewRequest::new(stars).with_text(text),
        ))
        .expect("review stored");
    }

    let reviews = rt
        .block_on(market.feedback.list_reviews(published.id()))
        .expect("reviews listed");
    let summary: Vec<_> = reviews
        .iter()
        .map(|review| (review.rating().stars(), review.text()))
        .collect();
    assert_eq!(summary, vec![(5, "Spotless."), (4, "Good, a little late.")]);
}

#[rstest]
fn favorites_toggle_and_list_per_user(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("favorites");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let provider = Actor::fresh(Role::Provider);
    let customer = Actor::fresh(Role::Customer);
    let first = rt
        .block_on(market.catalog.create_service(&provider, listing("Gutter cleaning", 60)))
        .expect("first listing");
    let second = rt
        .block_on(market.catalog.create_service(&provider, listing("Hedge trimming", 90)))
        .expect("second listing");

    for service_id in [first.id(), second.id()] {
        let favorited = rt
            .block_on(market.feedback.toggle_favorite(service_id, &customer))
            .expect("favorite added");
        assert!(favorited);
    }
    let removed = rt
        .block_on(market.feedback.toggle_favorite(first.id(), &customer))
        .expect("favorite removed");
    assert!(!removed);

    let favorites = rt
        .block_on(market.feedback.list_favorites(&customer))
        .expect("favorites listed");
    let ids: Vec<_> = favorites.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec![second.id()]);

    let others = rt
        .block_on(market.feedback.list_favorites(&Actor::fresh(Role::Customer)))
        .expect("other user's favorites");
    assert!(others.is_empty());
}

#[rstest]
fn review_for_unknown_listing_is_not_found(shared_test_cluster: &'static TestCluster) {
    let db_name = database_name("review_unknown");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let market = PgMarketplace::connect(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();

    let err = rt
        .block_on(market.feedback.create_review(
            ServiceId::new(),
            &Actor::fresh(Role::Customer),
            CreateReviewRequest::new(3),
        ))
        .expect_err("no such listing");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
