//! When steps for offer acceptance BDD scenarios.

use std::sync::Arc;

use super::world::{AcceptanceWorld, bid_request, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use skillmarket::{
    identity::domain::{Actor, Role},
    offer::domain::OfferId,
};

fn accept(world: &mut AcceptanceWorld, offer_id: OfferId, actor: Actor) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.assignments.accept_offer(task_id, offer_id, &actor));
    world.last_result = Some(result);
    Ok(())
}

#[when("the client accepts the first offer")]
fn client_accepts_first(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let offer_id = world.bid(1)?.1.id();
    let client = world.client;
    accept(world, offer_id, client)
}

#[when("the client accepts the second offer")]
fn client_accepts_second(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let offer_id = world.bid(2)?.1.id();
    let client = world.client;
    accept(world, offer_id, client)
}

#[when("a stranger accepts the first offer")]
fn stranger_accepts_first(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let offer_id = world.bid(1)?.1.id();
    accept(world, offer_id, Actor::fresh(Role::Customer))
}

#[when("the client accepts the foreign offer")]
fn client_accepts_foreign(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let offer_id = world
        .foreign_offer
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing foreign offer in scenario world"))?
        .id();
    let client = world.client;
    accept(world, offer_id, client)
}

fn submit(world: &mut AcceptanceWorld, provider: Actor, price: i64) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(
        world
            .offers
            .submit_offer(task_id, &provider, bid_request(price)),
    );
    if let Ok(ref offer) = result {
        world.bids.push((provider, offer.clone()));
    }
    world.last_submission = Some(result);
    Ok(())
}

#[when("a provider submits an offer of {price:i64}")]
fn provider_submits(world: &mut AcceptanceWorld, price: i64) -> Result<(), eyre::Report> {
    submit(world, Actor::fresh(Role::Provider), price)
}

#[when("the same provider submits an offer of {price:i64}")]
fn same_provider_submits(world: &mut AcceptanceWorld, price: i64) -> Result<(), eyre::Report> {
    let provider = world.bid(1)?.0;
    submit(world, provider, price)
}

#[when("the client accepts both offers concurrently")]
fn client_accepts_both(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let client = world.client;
    let offer_ids = [world.bid(1)?.1.id(), world.bid(2)?.1.id()];
    let handles = offer_ids.map(|offer_id| {
        let assignments = Arc::clone(&world.assignments);
        tokio::spawn(async move { assignments.accept_offer(task_id, offer_id, &client).await })
    });
    for handle in handles {
        let outcome = run_async(handle).wrap_err("join concurrent acceptance")?;
        world.concurrent_results.push(outcome);
    }
    Ok(())
}
