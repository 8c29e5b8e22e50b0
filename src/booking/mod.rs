//! Bookings: the confirmed, payable engagements both transaction paths end in.
//!
//! A booking originates either from a catalog listing (direct path) or from
//! an accepted offer (task path). Parties and price are fixed at creation.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
