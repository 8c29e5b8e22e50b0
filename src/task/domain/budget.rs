//! Budget pricing model.

use super::ParseBudgetTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a task budget is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    /// One price for the whole job.
    Fixed,
    /// Price per hour of work.
    Hourly,
}

impl BudgetType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Hourly => "hourly",
        }
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BudgetType {
    type Error = ParseBudgetTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "hourly" => Ok(Self::Hourly),
            _ => Err(ParseBudgetTypeError(value.to_owned())),
        }
    }
}
