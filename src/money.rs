//! Positive monetary amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Strictly positive exact decimal amount.
///
/// Prices, budgets, and booking totals all use this type so that zero and
/// negative amounts cannot be represented past the validation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Creates a validated amount.
    ///
    /// # Errors
    ///
    /// Returns [`NonPositiveAmount`] when `value` is zero or negative.
    pub fn new(value: Decimal) -> Result<Self, NonPositiveAmount> {
        if value <= Decimal::ZERO {
            return Err(NonPositiveAmount(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = NonPositiveAmount;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when an amount is not strictly positive.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("amount must be positive, got {0}")]
pub struct NonPositiveAmount(pub Decimal);
