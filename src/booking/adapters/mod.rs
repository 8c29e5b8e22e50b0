//! Adapter implementations of the booking ports.

pub mod memory;
pub mod postgres;
