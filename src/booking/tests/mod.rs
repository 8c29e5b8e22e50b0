//! Unit tests for the booking context.
