//! Notification sink adapters.

pub mod broadcast;
pub mod logging;
pub mod memory;
