//! Fixed identity provider for tests and single-user tooling.

use crate::identity::{
    domain::Actor,
    ports::{IdentityError, IdentityProvider},
};
use async_trait::async_trait;

/// Identity provider that always returns the same actor, or none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIdentityProvider {
    actor: Option<Actor>,
}

impl FixedIdentityProvider {
    /// Creates a provider that authenticates every request as `actor`.
    #[must_use]
    pub const fn signed_in(actor: Actor) -> Self {
        Self { actor: Some(actor) }
    }

    /// Creates a provider that rejects every request.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { actor: None }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentityProvider {
    async fn current_actor(&self) -> Result<Actor, IdentityError> {
        self.actor.ok_or(IdentityError::Unauthenticated)
    }
}
