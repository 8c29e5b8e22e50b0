//! Unit tests for the offer context.
