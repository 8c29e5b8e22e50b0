//! Fixed-price service listings booked directly by customers.
//!
//! The catalog is plain CRUD. Its only coupling to the booking workflow is
//! the price snapshot taken when a direct booking is created.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
