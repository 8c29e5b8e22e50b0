//! Adapter implementations of the task ports.

pub mod geocoding;
pub mod media;
pub mod memory;
pub mod postgres;
