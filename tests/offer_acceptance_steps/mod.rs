//! Step definitions for offer acceptance scenarios.

mod then;
mod when;
pub mod world;
