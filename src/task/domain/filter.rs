//! Query filter for task listings.

use super::{Coordinates, Task, TaskStatus};
use rust_decimal::Decimal;

/// Default maximum number of tasks returned by a listing.
const DEFAULT_LIMIT: usize = 50;

/// Search radius around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Search centre.
    pub center: Coordinates,
    /// Maximum distance from the centre in kilometres.
    pub radius_km: f64,
}

/// Criteria for listing tasks, newest first.
///
/// Defaults to open tasks, at most fifty of them.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFilter {
    status: TaskStatus,
    category: Option<String>,
    text: Option<String>,
    min_budget: Option<Decimal>,
    max_budget: Option<Decimal>,
    near: Option<Proximity>,
    limit: usize,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: TaskStatus::Open,
            category: None,
            text: None,
            min_budget: None,
            max_budget: None,
            near: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TaskFilter {
    /// Creates a filter for open tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Restricts results to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Matches a case-insensitive substring of title or description.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Restricts results to budgets within the inclusive range.
    #[must_use]
    pub const fn with_budget_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_budget = min;
        self.max_budget = max;
        self
    }

    /// Restricts results to geocoded tasks within `radius_km` of `center`.
    #[must_use]
    pub const fn near(mut self, center: Coordinates, radius_km: f64) -> Self {
        self.near = Some(Proximity { center, radius_km });
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the status criterion.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the category criterion.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the free-text criterion.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the lower budget bound.
    #[must_use]
    pub const fn min_budget(&self) -> Option<Decimal> {
        self.min_budget
    }

    /// Returns the upper budget bound.
    #[must_use]
    pub const fn max_budget(&self) -> Option<Decimal> {
        self.max_budget
    }

    /// Returns the proximity criterion.
    #[must_use]
    pub const fn proximity(&self) -> Option<Proximity> {
        self.near
    }

    /// Returns the result cap.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns whether `task` satisfies every criterion except the limit.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_stored_fields(task) && self.matches_proximity(task)
    }

    /// Returns whether `task` satisfies every criterion a store can index:
    /// status, category, text, and budget.
    #[must_use]
    pub fn matches_stored_fields(&self, task: &Task) -> bool {
        let details = task.details();
        let budget = details.budget.amount();
        task.status() == self.status
            && self
                .category
                .as_deref()
                .is_none_or(|category| details.category == category)
            && self.text.as_deref().is_none_or(|needle| {
                let lowered = needle.to_lowercase();
                details.title.to_lowercase().contains(&lowered)
                    || details.description.to_lowercase().contains(&lowered)
            })
            && self.min_budget.is_none_or(|min| budget >= min)
            && self.max_budget.is_none_or(|max| budget <= max)
    }

    /// Returns whether `task` lies within the proximity radius, if one is set.
    ///
    /// Tasks without coordinates never match a proximity criterion.
    #[must_use]
    pub fn matches_proximity(&self, task: &Task) -> bool {
        self.near.is_none_or(|proximity| {
            task.details()
                .location
                .coordinates()
                .is_some_and(|point| point.distance_km(proximity.center) <= proximity.radius_km)
        })
    }
}
