//! Adapter implementations of the catalog ports.

pub mod memory;
pub mod postgres;
