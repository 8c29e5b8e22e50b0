//! Booking origin discriminator.

use crate::{catalog::domain::ServiceId, task::domain::TaskId};
use serde::{Deserialize, Serialize};

/// Where a booking came from; exactly one reference, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum BookingOrigin {
    /// Booked directly from a catalog listing.
    Service(ServiceId),
    /// Created by accepting an offer on a task.
    Task(TaskId),
}

impl BookingOrigin {
    /// Returns the canonical storage label of the origin kind.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Task(_) => "task",
        }
    }

    /// Returns the listing reference, if booked directly.
    #[must_use]
    pub const fn service_id(self) -> Option<ServiceId> {
        match self {
            Self::Service(id) => Some(id),
            Self::Task(_) => None,
        }
    }

    /// Returns the task reference, if created by offer acceptance.
    #[must_use]
    pub const fn task_id(self) -> Option<TaskId> {
        match self {
            Self::Task(id) => Some(id),
            Self::Service(_) => None,
        }
    }
}
