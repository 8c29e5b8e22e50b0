//! Domain model for client-posted tasks.
//!
//! A task is a request for help that providers bid on. Its status follows a
//! small directed graph; descriptive and commercial fields freeze once the
//! task leaves `open`.

mod budget;
mod error;
mod filter;
mod ids;
mod location;
mod status;
mod task;

pub use budget::BudgetType;
pub use error::{ParseBudgetTypeError, ParseTaskStatusError, TaskDomainError};
pub use filter::{Proximity, TaskFilter};
pub use ids::{PhotoUrl, TaskId};
pub use location::{Coordinates, Location};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDetails, TaskEdit};
