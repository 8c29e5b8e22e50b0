//! Task lifecycle status and its transition graph.

use super::ParseTaskStatusError;
use crate::lifecycle::StatusGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// ```text
/// open --assign--> assigned --complete--> completed
/// open --cancel--> cancelled
/// assigned --cancel--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepting offers.
    Open,
    /// An offer was accepted and a provider assigned.
    Assigned,
    /// The assigned work is done.
    Completed,
    /// The task was withdrawn.
    Cancelled,
}

impl TaskStatus {
    /// All statuses, in graph order.
    pub const ALL: [Self; 4] = [Self::Open, Self::Assigned, Self::Completed, Self::Cancelled];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the status carries an assigned provider.
    #[must_use]
    pub const fn has_provider(self) -> bool {
        matches!(self, Self::Assigned | Self::Completed)
    }
}

impl StatusGraph for TaskStatus {
    fn successors(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::Assigned, Self::Cancelled],
            Self::Assigned => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
