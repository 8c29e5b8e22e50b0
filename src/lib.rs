//! Skillmarket: a local-services marketplace core.
//!
//! Requesters reach providers along two paths. On the catalog path a
//! customer books a fixed-price service listing directly. On the request
//! path a client posts a task, providers bid on it with offers, and the
//! client accepts one. Both paths end in a single booking record.
//!
//! # Architecture
//!
//! Skillmarket follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`, HTTP)
//! - **Services**: Orchestration of domain rules over ports
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, filtering, geocoding and media ports
//! - [`offer`]: Offer submission, decline and visibility rules
//! - [`assignment`]: Atomic offer acceptance
//! - [`booking`]: Direct bookings, booking lifecycle and payment status
//! - [`catalog`]: Service listings
//! - [`identity`]: Users, roles and the acting party
//! - [`notification`]: Domain events and sinks

pub mod assignment;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod money;
pub mod notification;
pub mod offer;
pub mod postgres;
pub mod task;
pub mod validation;
