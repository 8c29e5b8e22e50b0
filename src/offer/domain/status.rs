//! Offer status.

use super::ParseOfferStatusError;
use crate::lifecycle::StatusGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offer status. Both decisions are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Awaiting the task owner's decision.
    Sent,
    /// Accepted; the task is assigned to the offer's provider.
    Accepted,
    /// Declined by the task owner.
    Declined,
}

impl OfferStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl StatusGraph for OfferStatus {
    fn successors(self) -> &'static [Self] {
        match self {
            Self::Sent => &[Self::Accepted, Self::Declined],
            Self::Accepted | Self::Declined => &[],
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OfferStatus {
    type Error = ParseOfferStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sent" => Ok(Self::Sent),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseOfferStatusError(value.to_owned())),
        }
    }
}
