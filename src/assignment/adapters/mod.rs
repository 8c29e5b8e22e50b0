//! Adapter implementations of the assignment store.

pub mod memory;
pub mod postgres;
