//! Geocoding port.

use crate::task::domain::Coordinates;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Resolves free-text locations to coordinates.
///
/// Geocoding is best effort: callers treat both `Ok(None)` and errors as
/// "no coordinates" and carry on.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `text` to coordinates.
    ///
    /// Returns `Ok(None)` when the location is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] when the lookup itself failed.
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Errors raised by geocoders.
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    /// The geocoding service could not be reached or answered with an error.
    #[error("geocoding request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),

    /// The geocoding service answered with an unusable payload.
    #[error("invalid geocoding response: {0}")]
    InvalidResponse(String),
}
