//! Port for resolving the acting user of a request.

use super::domain::Actor;
use crate::error::ErrorKind;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Supplies the authenticated actor for the current request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the current actor.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unauthenticated`] when the request carries no
    /// valid identity.
    async fn current_actor(&self) -> Result<Actor, IdentityError>;
}

/// Errors raised while resolving an actor.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// No authenticated actor is present.
    #[error("request is not authenticated")]
    Unauthenticated,

    /// The identity provider itself failed.
    #[error("identity provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Provider(_) => ErrorKind::Unavailable,
        }
    }
}
