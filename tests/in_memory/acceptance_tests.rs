//! In-memory integration tests for offer acceptance across contexts.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;
use rust_decimal::Decimal;
use skillmarket::{
    assignment::{domain::Acceptance, ports::AssignmentStore, services::AssignmentError},
    booking::{
        domain::{BookingStatus, PaymentStatus},
        ports::BookingRepository,
    },
    error::ErrorKind,
    identity::domain::{Actor, Role},
    offer::domain::{Offer, OfferStatus},
    task::{
        domain::{Task, TaskStatus},
        services::UpdateTaskRequest,
    },
};

use super::helpers::{Marketplace, marketplace};

/// Checks the offer statuses a client sees on `task`.
///
/// # Errors
///
/// Returns an error if any offer is missing or carries another status.
async fn ensure_offer_statuses(
    marketplace: &Marketplace,
    task: &Task,
    client: &Actor,
    expected: &[(&Offer, OfferStatus)],
) -> eyre::Result<()> {
    let offers = marketplace
        .offers
        .list_offers_for_task(task.id(), client)
        .await?;
    for (offer, status) in expected {
        let stored = offers
            .iter()
            .find(|candidate| candidate.id() == offer.id())
            .ok_or_else(|| eyre::eyre!("offer {} missing", offer.id()))?;
        eyre::ensure!(
            stored.status() == *status,
            "offer {} is {}, expected {status}",
            offer.id(),
            stored.status()
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn acceptance_assigns_task_and_books_at_offer_price(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (provider, chosen) = marketplace.bid(&task, 140).await.expect("first bid");
    let (_, other) = marketplace.bid(&task, 120).await.expect("second bid");

    let acceptance = marketplace
        .assignments
        .accept_offer(task.id(), chosen.id(), &client)
        .await
        .expect("offer accepted");

    let assigned = marketplace
        .tasks
        .get_task(task.id())
        .await
        .expect("task lookup");
    assert_eq!(assigned.status(), TaskStatus::Assigned);
    assert_eq!(assigned.assigned_provider(), Some(provider.id()));
    ensure_offer_statuses(
        &marketplace,
        &task,
        &client,
        &[(&chosen, OfferStatus::Accepted), (&other, OfferStatus::Sent)],
    )
    .await
    .expect("offer statuses");

    let booking = acceptance.booking();
    assert_eq!(booking.status(), BookingStatus::Confirmed);
    assert_eq!(booking.payment_status(), PaymentStatus::Unpaid);
    assert_eq!(booking.total_price().amount(), Decimal::new(140, 0));
    assert_eq!(booking.origin().task_id(), Some(task.id()));

    let provider_view = marketplace
        .bookings
        .list_bookings_for(&provider)
        .await
        .expect("provider bookings");
    assert_eq!(provider_view.len(), 1);
    assert_eq!(
        marketplace.sink.event_names(),
        vec![
            "offer.created",
            "offer.created",
            "task.assigned",
            "booking.created"
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_acceptances_yield_one_booking(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (_, first) = marketplace.bid(&task, 140).await.expect("first bid");
    let (_, second) = marketplace.bid(&task, 160).await.expect("second bid");

    let handles = [first.id(), second.id()].map(|offer_id| {
        let assignments = Arc::clone(&marketplace.assignments);
        let task_id = task.id();
        tokio::spawn(async move { assignments.accept_offer(task_id, offer_id, &client).await })
    });
    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.expect("acceptance task joined"));
    }

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .all(|err| err.kind() == ErrorKind::TaskNotOpen)
    );
    let booking = marketplace
        .booking_store
        .find_by_task(task.id())
        .await
        .expect("booking lookup");
    assert!(booking.is_some());
    let client_view = marketplace
        .bookings
        .list_bookings_for(&client)
        .await
        .expect("client bookings");
    assert_eq!(client_view.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_task_refuses_new_bids_and_acceptances(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (_, chosen) = marketplace.bid(&task, 140).await.expect("first bid");
    let (_, runner_up) = marketplace.bid(&task, 150).await.expect("second bid");
    marketplace
        .assignments
        .accept_offer(task.id(), chosen.id(), &client)
        .await
        .expect("offer accepted");

    let late_bid = marketplace
        .bid(&task, 130)
        .await
        .expect_err("bid after assignment");
    assert!(late_bid.to_string().contains("not open"));

    let err = marketplace
        .assignments
        .accept_offer(task.id(), runner_up.id(), &client)
        .await
        .expect_err("second acceptance");
    assert!(matches!(
        err,
        AssignmentError::TaskNotOpen {
            status: TaskStatus::Assigned,
            ..
        }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mismatched_offer_writes_nothing(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let other_task = marketplace.post_task(&client).await.expect("other task posted");
    let (_, foreign) = marketplace.bid(&other_task, 90).await.expect("foreign bid");

    let err = marketplace
        .assignments
        .accept_offer(task.id(), foreign.id(), &client)
        .await
        .expect_err("offer belongs to another task");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    for id in [task.id(), other_task.id()] {
        let stored = marketplace.tasks.get_task(id).await.expect("task lookup");
        assert_eq!(stored.status(), TaskStatus::Open);
    }
    ensure_offer_statuses(
        &marketplace,
        &other_task,
        &client,
        &[(&foreign, OfferStatus::Sent)],
    )
    .await
    .expect("offer untouched");
    assert!(
        marketplace
            .booking_store
            .find_by_task(task.id())
            .await
            .expect("booking lookup")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_provider_completes_the_task(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (provider, chosen) = marketplace.bid(&task, 140).await.expect("bid placed");
    marketplace
        .assignments
        .accept_offer(task.id(), chosen.id(), &client)
        .await
        .expect("offer accepted");

    let completed = marketplace
        .tasks
        .update_status(task.id(), TaskStatus::Completed, &provider)
        .await
        .expect("provider completes");
    assert_eq!(completed.status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_between_prepare_and_commit_survives_acceptance(marketplace: Marketplace) {
    let client = Actor::fresh(Role::Customer);
    let task = marketplace.post_task(&client).await.expect("task posted");
    let (provider, offer) = marketplace.bid(&task, 140).await.expect("bid");
    let read = marketplace
        .tasks
        .get_task(task.id())
        .await
        .expect("task lookup");
    let acceptance =
        Acceptance::prepare(read, offer, &DefaultClock).expect("acceptance prepared");

    marketplace
        .tasks
        .update_task(
            task.id(),
            &client,
            UpdateTaskRequest::new().with_title("Assemble TWO loft beds"),
        )
        .await
        .expect("owner edit");
    marketplace
        .assignment_store
        .commit(&acceptance)
        .await
        .expect("commit");

    let stored = marketplace
        .tasks
        .get_task(task.id())
        .await
        .expect("task lookup");
    assert_eq!(stored.details().title, "Assemble TWO loft beds");
    assert_eq!(stored.status(), TaskStatus::Assigned);
    assert_eq!(stored.assigned_provider(), Some(provider.id()));
    assert_eq!(stored.offers_count(), 1);
}
