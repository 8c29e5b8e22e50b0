//! In-memory integration tests for catalog listings.

use rstest::rstest;
use rust_decimal::Decimal;
use skillmarket::{
    catalog::{
        domain::ServiceFilter,
        services::{CreateReviewRequest, CreateServiceRequest, UpdateServiceRequest},
    },
    error::ErrorKind,
    identity::domain::{Actor, Role},
};

use super::helpers::{Marketplace, marketplace};

fn listing(title: &str, category: &str, price: i64) -> CreateServiceRequest {
    CreateServiceRequest::new(
        title,
        "Careful work, references on request.",
        category,
        Decimal::new(price, 0),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customers_cannot_publish(marketplace: Marketplace) {
    let err = marketplace
        .catalog
        .create_service(
            &Actor::fresh(Role::Customer),
            listing("Gutter cleaning", "outdoor", 60),
        )
        .await
        .expect_err("customer may not list");
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_filters_by_category_text_and_price(marketplace: Marketplace) {
    let provider = Actor::fresh(Role::Provider);
    for (title, category, price) in [
        ("Gutter cleaning", "outdoor", 60),
        ("Hedge trimming", "outdoor", 90),
        ("Wardrobe assembly", "assembly", 70),
    ] {
        marketplace
            .catalog
            .create_service(&provider, listing(title, category, price))
            .await
            .expect("listing published");
    }

    let outdoor = marketplace
        .catalog
        .list_services(&ServiceFilter::new().with_category("outdoor"))
        .await
        .expect("category search");
    assert_eq!(outdoor.len(), 2);

    let cheap_outdoor = marketplace
        .catalog
        .list_services(
            &ServiceFilter::new()
                .with_category("outdoor")
                .with_price_range(None, Some(Decimal::new(75, 0))),
        )
        .await
        .expect("price search");
    let titles: Vec<&str> = cheap_outdoor.iter().map(|l| l.title()).collect();
    assert_eq!(titles, vec!["Gutter cleaning"]);

    let by_text = marketplace
        .catalog
        .list_services(&ServiceFilter::new().with_text("WARDROBE"))
        .await
        .expect("text search");
    assert_eq!(by_text.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_owner_or_admin_edits_a_listing(marketplace: Marketplace) {
    let provider = Actor::fresh(Role::Provider);
    let created = marketplace
        .catalog
        .create_service(&provider, listing("Hedge trimming", "outdoor", 90))
        .await
        .expect("listing published");

    let err = marketplace
        .catalog
        .update_service(
            created.id(),
            &Actor::fresh(Role::Provider),
            UpdateServiceRequest::new().with_price(Decimal::new(10, 0)),
        )
        .await
        .expect_err("another provider");
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let edited = marketplace
        .catalog
        .update_service(
            created.id(),
            &Actor::fresh(Role::Admin),
            UpdateServiceRequest::new().with_title("Hedge and shrub trimming"),
        )
        .await
        .expect("admin edit");
    assert_eq!(edited.title(), "Hedge and shrub trimming");
    assert_eq!(edited.price(), created.price());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviews_and_favorites_follow_the_listing(marketplace: Marketplace) {
    let provider = Actor::fresh(Role::Provider);
    let customer = Actor::fresh(Role::Customer);
    let published = marketplace
        .catalog
        .create_service(&provider, listing("Gutter cleaning", "outdoor", 60))
        .await
        .expect("listing published");

    marketplace
        .feedback
        .create_review(
            published.id(),
            &customer,
            CreateReviewRequest::new(5).with_text("On time, left no mess."),
        )
        .await
        .expect("review stored");
    let favorited = marketplace
        .feedback
        .toggle_favorite(published.id(), &customer)
        .await
        .expect("favorite toggled");
    marketplace
        .catalog
        .update_service(
            published.id(),
            &provider,
            UpdateServiceRequest::new().with_price(Decimal::new(75, 0)),
        )
        .await
        .expect("price edited");

    let reviews = marketplace
        .feedback
        .list_reviews(published.id())
        .await
        .expect("reviews listed");
    let favorites = marketplace
        .feedback
        .list_favorites(&customer)
        .await
        .expect("favorites listed");
    assert!(favorited);
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews.first().map(|review| review.text()), Some("On time, left no mess."));
    assert_eq!(favorites.len(), 1);
    assert_eq!(
        favorites.first().map(|listing| listing.price().amount()),
        Some(Decimal::new(75, 0))
    );
}
