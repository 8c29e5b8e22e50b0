//! Actor identity consumed by the marketplace.
//!
//! Authentication happens elsewhere. The marketplace only needs to know who
//! is acting and in which role, which the [`ports::IdentityProvider`] port
//! supplies for each request.

pub mod adapters;
pub mod domain;
pub mod ports;
