//! In-memory integration tests for offer submission.

use rstest::rstest;
use skillmarket::{
    error::ErrorKind,
    identity::domain::{Actor, Role},
    offer::services::OfferServiceError,
    task::domain::TaskStatus,
};

use super::helpers::{Marketplace, leipzig, marketplace, offer_request};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn posted_task_is_geocoded_and_open(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");

    assert_eq!(task.status(), TaskStatus::Open);
    assert_eq!(task.offers_count(), 0);
    assert_eq!(task.details().location.coordinates(), Some(leipzig()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bid_bumps_counter_and_duplicate_is_rejected(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (provider, offer) = marketplace.bid(&task, 140).await.expect("bid placed");

    let stored = marketplace
        .tasks
        .get_task(task.id())
        .await
        .expect("task lookup");
    assert_eq!(stored.offers_count(), 1);

    let err = marketplace
        .offers
        .submit_offer(task.id(), &provider, offer_request(120))
        .await
        .expect_err("second bid from the same provider");
    assert!(matches!(err, OfferServiceError::DuplicateOffer { .. }));
    assert_eq!(err.kind(), ErrorKind::DuplicateOffer);

    let visible = marketplace
        .offers
        .list_offers_for_task(task.id(), &client)
        .await
        .expect("owner listing");
    assert_eq!(visible.iter().map(|o| o.id()).collect::<Vec<_>>(), vec![offer.id()]);
    assert_eq!(
        marketplace.sink.event_names(),
        vec!["offer.created"],
        "only the first bid is announced"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_cannot_bid_on_own_task(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");

    let err = marketplace
        .offers
        .submit_offer(task.id(), &client, offer_request(140))
        .await
        .expect_err("self offer");
    assert!(matches!(err, OfferServiceError::SelfOffer { .. }));
    assert_eq!(err.kind(), ErrorKind::SelfOfferForbidden);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn providers_see_only_their_own_offers(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (first_provider, first) = marketplace.bid(&task, 140).await.expect("first bid");
    marketplace.bid(&task, 160).await.expect("second bid");

    let own = marketplace
        .offers
        .list_offers_for_task(task.id(), &first_provider)
        .await
        .expect("provider listing");
    assert_eq!(own.len(), 1);
    assert_eq!(own.first().map(|o| o.id()), Some(first.id()));

    let all = marketplace
        .offers
        .list_offers_for_task(task.id(), &client)
        .await
        .expect("owner listing");
    assert_eq!(all.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_task_takes_no_bids(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    marketplace
        .tasks
        .update_status(task.id(), TaskStatus::Cancelled, &client)
        .await
        .expect("client cancels");

    let err = marketplace
        .bid(&task, 140)
        .await
        .expect_err("bid on cancelled task");
    let service_err = err
        .downcast_ref::<OfferServiceError>()
        .expect("offer service error");
    assert_eq!(service_err.kind(), ErrorKind::TaskNotOpen);
}
