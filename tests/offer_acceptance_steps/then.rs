//! Then steps for offer acceptance BDD scenarios.

use super::world::{AcceptanceWorld, run_async};
use rust_decimal::Decimal;
use skillmarket::{
    booking::{domain::BookingStatus, ports::BookingRepository},
    offer::domain::OfferStatus,
    task::domain::TaskStatus,
};
use rstest_bdd_macros::then;

#[then(r#"the task is "{status}""#)]
fn task_is(world: &AcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let stored = run_async(world.tasks.get_task(world.task()?.id()))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected task {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("the task is assigned to the first provider")]
fn task_assigned_to_first(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let stored = run_async(world.tasks.get_task(world.task()?.id()))?;
    let (provider, _) = world.bid(1)?;
    eyre::ensure!(
        stored.assigned_provider() == Some(provider.id()),
        "task assigned to {:?}",
        stored.assigned_provider()
    );
    Ok(())
}

#[then(r#"the second offer is "{status}""#)]
fn second_offer_is(world: &AcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = OfferStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let (_, offer) = world.bid(2)?;
    let offers = run_async(
        world
            .offers
            .list_offers_for_task(world.task()?.id(), &world.client),
    )?;
    let stored = offers
        .iter()
        .find(|candidate| candidate.id() == offer.id())
        .ok_or_else(|| eyre::eyre!("second offer missing"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected offer {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("a confirmed booking exists at {price:i64}")]
fn confirmed_booking_exists(world: &AcceptanceWorld, price: i64) -> Result<(), eyre::Report> {
    let booking = run_async(world.bookings.find_by_task(world.task()?.id()))?
        .ok_or_else(|| eyre::eyre!("no booking for task"))?;
    eyre::ensure!(
        booking.status() == BookingStatus::Confirmed,
        "booking is {}",
        booking.status()
    );
    eyre::ensure!(
        booking.total_price().amount() == Decimal::new(price, 0),
        "booking priced at {}",
        booking.total_price().amount()
    );
    Ok(())
}

#[then("no booking exists for the task")]
fn no_booking_exists(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let booking = run_async(world.bookings.find_by_task(world.task()?.id()))?;
    eyre::ensure!(booking.is_none(), "unexpected booking {booking:?}");
    Ok(())
}

#[then(r#"acceptance fails with "{kind}""#)]
fn acceptance_fails_with(world: &AcceptanceWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing acceptance result"))?;
    match result {
        Ok(acceptance) => Err(eyre::eyre!(
            "expected {kind}, but booking {} was created",
            acceptance.booking().id()
        )),
        Err(err) if err.kind().as_str() == kind => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {kind}, got {err:?}")),
    }
}

#[then(r#"the offer is recorded as "{status}""#)]
fn offer_recorded_as(world: &AcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = OfferStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let offer = match world.last_submission.as_ref() {
        Some(Ok(offer)) => offer,
        Some(Err(err)) => return Err(eyre::eyre!("submission failed: {err:?}")),
        None => return Err(eyre::eyre!("missing submission result")),
    };
    eyre::ensure!(
        offer.status() == expected,
        "expected offer {expected}, found {}",
        offer.status()
    );
    Ok(())
}

#[then("the task offer count is {count:u32}")]
fn task_offer_count_is(world: &AcceptanceWorld, count: u32) -> Result<(), eyre::Report> {
    let stored = run_async(world.tasks.get_task(world.task()?.id()))?;
    eyre::ensure!(
        stored.offers_count() == count,
        "expected {count} offers, found {}",
        stored.offers_count()
    );
    Ok(())
}

#[then(r#"submission fails with "{kind}""#)]
fn submission_fails_with(world: &AcceptanceWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_submission.as_ref() {
        Some(Err(err)) if err.kind().as_str() == kind => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected {kind}, got {err:?}")),
        Some(Ok(offer)) => Err(eyre::eyre!("expected {kind}, but offer {} was stored", offer.id())),
        None => Err(eyre::eyre!("missing submission result")),
    }
}

#[then("exactly one acceptance succeeds")]
fn exactly_one_acceptance_succeeds(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let winners = world
        .concurrent_results
        .iter()
        .filter(|outcome| outcome.is_ok())
        .count();
    eyre::ensure!(winners == 1, "expected one winner, found {winners}");
    Ok(())
}

#[then(r#"the losing acceptance fails with "{kind}""#)]
fn losing_acceptance_fails_with(world: &AcceptanceWorld, kind: String) -> Result<(), eyre::Report> {
    let losers: Vec<&str> = world
        .concurrent_results
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .map(|err| err.kind().as_str())
        .collect();
    eyre::ensure!(losers == [kind.as_str()], "unexpected losers {losers:?}");
    Ok(())
}

#[then("exactly one booking exists for the task")]
fn exactly_one_booking_exists(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let task = run_async(world.tasks.get_task(world.task()?.id()))?;
    let booking = run_async(world.bookings.find_by_task(task.id()))?
        .ok_or_else(|| eyre::eyre!("no booking for task"))?;
    eyre::ensure!(
        task.assigned_provider() == Some(booking.provider()),
        "booking provider differs from assigned provider"
    );
    let for_client = run_async(world.bookings.list_for_customer(world.client.id()))?;
    eyre::ensure!(
        for_client.len() == 1,
        "expected one booking, found {}",
        for_client.len()
    );
    Ok(())
}
