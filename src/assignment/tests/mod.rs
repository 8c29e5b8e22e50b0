//! Unit tests for offer acceptance.


use crate::{
    config::OfferLimits,
    identity::domain::UserId,
    money::Money,
    offer::domain::{Offer, OfferTerms},
    task::domain::{BudgetType, Location, Task, TaskDetails},
};
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rust_decimal::Decimal;

/// An open fixed-budget task of 150 owned by `client`.
fn open_task(client: UserId) -> Task {
    let details = TaskDetails {
        title: "Move a sofa".to_owned(),
        description: "Third floor, no lift, two streets away.".to_owned(),
        category: "moving".to_owned(),
        location: Location::new("Leipzig".to_owned(), None),
        photos: Vec::new(),
        budget_type: BudgetType::Fixed,
        budget: Money::new(Decimal::new(150, 0)).expect("positive budget"),
        scheduled_at: Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).single(),
    };
    Task::new(client, details, &DefaultClock)
}

/// A sent offer on `task` from `provider` at `price`.
fn sent_offer(task: &Task, provider: UserId, price: i64) -> Offer {
    let terms = OfferTerms::new(
        "Two of us, with a van.",
        Decimal::new(price, 0),
        None,
        &OfferLimits::default(),
    )
    .expect("valid terms");
    Offer::new(task.id(), provider, terms, &DefaultClock)
}
