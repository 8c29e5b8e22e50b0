//! Unit tests for the service catalog.
