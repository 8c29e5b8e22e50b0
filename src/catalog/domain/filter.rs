//! Query filter for catalog listings.

use super::ServiceListing;
use rust_decimal::Decimal;

/// Criteria for listing services, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    category: Option<String>,
    text: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
}

impl ServiceFilter {
    /// Creates a filter matching every listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Matches a case-insensitive substring of title, description, or a tag.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Restricts results to prices within the inclusive range.
    #[must_use]
    pub const fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
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

    /// Returns the lower price bound.
    #[must_use]
    pub const fn min_price(&self) -> Option<Decimal> {
        self.min_price
    }

    /// Returns the upper price bound.
    #[must_use]
    pub const fn max_price(&self) -> Option<Decimal> {
        self.max_price
    }

    /// Returns whether `listing` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, listing: &ServiceListing) -> bool {
        let price = listing.price().amount();
        self.category
            .as_deref()
            .is_none_or(|category| listing.category() == category)
            && self.text.as_deref().is_none_or(|needle| {
                let lowered = needle.to_lowercase();
                listing.title().to_lowercase().contains(&lowered)
                    || listing.description().to_lowercase().contains(&lowered)
                    || listing
                        .tags()
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&lowered))
            })
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}
