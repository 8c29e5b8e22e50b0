//! Client-posted tasks that providers bid on.
//!
//! A task moves along a small status graph. The `open` to `assigned` edge is
//! taken only by offer acceptance in [`crate::assignment`]; everything else
//! goes through [`services::TaskService`]. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
