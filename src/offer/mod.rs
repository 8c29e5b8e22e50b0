//! Provider bids against open tasks.
//!
//! At most one offer exists per task and provider, enforced by the store.
//! An offer leaves `sent` exactly once: declined by the task owner here, or
//! accepted by [`crate::assignment`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
