//! Domain events and the notification sink they are emitted to.
//!
//! Services emit typed [`domain::DomainEvent`]s after a state change has been
//! committed. Delivery, fan-out and subscription membership belong to the
//! sink; a failing sink never fails the operation that emitted the event.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use domain::DomainEvent;
pub use ports::emit_best_effort;
