//! Unit tests for the task context.


use crate::{
    money::Money,
    task::domain::{BudgetType, Coordinates, Location, TaskDetails},
};
use rust_decimal::Decimal;

/// Berlin Mitte, used as the default geocoded location.
fn berlin() -> Coordinates {
    Coordinates::new(52.52, 13.405).expect("valid coordinates")
}

fn sample_details() -> TaskDetails {
    TaskDetails {
        title: "Assemble wardrobe".to_owned(),
        description: "Two-door wardrobe, all parts present.".to_owned(),
        category: "furniture".to_owned(),
        location: Location::new("Berlin Mitte".to_owned(), Some(berlin())),
        photos: Vec::new(),
        budget_type: BudgetType::Fixed,
        budget: Money::new(Decimal::new(150, 0)).expect("positive budget"),
        scheduled_at: None,
    }
}
