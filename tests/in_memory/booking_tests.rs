//! In-memory integration tests for direct bookings.

use rstest::rstest;
use rust_decimal::Decimal;
use skillmarket::{
    booking::{
        domain::{BookingStatus, PaymentStatus},
        services::DirectBookingRequest,
    },
    catalog::{domain::ServiceListing, services::CreateServiceRequest},
    error::ErrorKind,
    identity::domain::{Actor, Role},
};

use super::helpers::{Marketplace, marketplace};

/// Publishes a listing at 80 for a fresh provider.
///
/// # Errors
///
/// Returns an error if the catalog rejects the listing.
async fn publish(marketplace: &Marketplace) -> eyre::Result<(Actor, ServiceListing)> {
    let provider = Actor::fresh(Role::Provider);
    let listing = marketplace
        .catalog
        .create_service(
            &provider,
            CreateServiceRequest::new(
                "Furniture assembly",
                "Flat-pack furniture, any brand.",
                "assembly",
                Decimal::new(80, 0),
            ),
        )
        .await?;
    Ok((provider, listing))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn direct_booking_runs_to_completion(marketplace: Marketplace) {
    let (provider, listing) = publish(&marketplace).await.expect("listing published");
    let customer = Actor::fresh(Role::Customer);

    let booking = marketplace
        .bookings
        .create_direct_booking(listing.id(), &customer, DirectBookingRequest::new())
        .await
        .expect("booking created");
    assert_eq!(booking.status(), BookingStatus::Pending);
    assert_eq!(booking.origin().service_id(), Some(listing.id()));
    assert_eq!(booking.total_price(), listing.price());

    marketplace
        .bookings
        .update_status(booking.id(), BookingStatus::Confirmed, &provider)
        .await
        .expect("provider confirms");
    marketplace
        .bookings
        .set_payment_status(booking.id(), PaymentStatus::Paid)
        .await
        .expect("payment recorded");
    marketplace
        .bookings
        .update_status(booking.id(), BookingStatus::Completed, &customer)
        .await
        .expect("customer completes");

    let stored = marketplace
        .bookings
        .get_booking(booking.id(), &customer)
        .await
        .expect("customer view");
    assert_eq!(stored.status(), BookingStatus::Completed);
    assert_eq!(stored.payment_status(), PaymentStatus::Paid);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_booking_cannot_skip_to_completed(marketplace: Marketplace) {
    let (provider, listing) = publish(&marketplace).await.expect("listing published");
    let booking = marketplace
        .bookings
        .create_direct_booking(
            listing.id(),
            &Actor::fresh(Role::Customer),
            DirectBookingRequest::new(),
        )
        .await
        .expect("booking created");

    let err = marketplace
        .bookings
        .update_status(booking.id(), BookingStatus::Completed, &provider)
        .await
        .expect_err("pending to completed");
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_booking_stays_cancelled(marketplace: Marketplace) {
    let (provider, listing) = publish(&marketplace).await.expect("listing published");
    let customer = Actor::fresh(Role::Customer);
    let booking = marketplace
        .bookings
        .create_direct_booking(listing.id(), &customer, DirectBookingRequest::new())
        .await
        .expect("booking created");
    marketplace
        .bookings
        .update_status(booking.id(), BookingStatus::Cancelled, &customer)
        .await
        .expect("customer cancels");

    let err = marketplace
        .bookings
        .update_status(booking.id(), BookingStatus::Confirmed, &provider)
        .await
        .expect_err("terminal booking");
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    let provider_view = marketplace
        .bookings
        .list_bookings_for(&provider)
        .await
        .expect("provider list");
    assert_eq!(
        provider_view.first().map(|b| b.status()),
        Some(BookingStatus::Cancelled)
    );
}
