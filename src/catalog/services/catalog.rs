//! Catalog CRUD with role and ownership checks.

use crate::{
    catalog::{
        domain::{CatalogDomainError, ListingEdit, ServiceFilter, ServiceId, ServiceListing},
        ports::{ServiceRepository, ServiceRepositoryError},
    },
    error::ErrorKind,
    identity::domain::{Actor, Role, UserId},
    money::Money,
    validation::{FieldError, required_text},
};
use mockable::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for publishing a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateServiceRequest {
    title: String,
    description: String,
    category: String,
    price: Decimal,
    tags: Vec<String>,
}

impl CreateServiceRequest {
    /// Creates a request with the required listing fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            price,
            tags: Vec::new(),
        }
    }

    /// Sets the listing tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Allow-listed partial update of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateServiceRequest {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    price: Option<Decimal>,
    tags: Option<Vec<String>>,
}

impl UpdateServiceRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets a new price.
    #[must_use]
    pub const fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }
}

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// The listing does not exist.
    #[error("service not found: {0}")]
    NotFound(ServiceId),

    /// Only providers and admins may publish listings.
    #[error("user {actor} with role {role} may not publish services")]
    RoleNotPermitted {
        /// Rejected actor.
        actor: UserId,
        /// Role of the rejected actor.
        role: Role,
    },

    /// Only the owner or an admin may edit a listing.
    #[error("user {actor} may not modify service {service_id}")]
    Forbidden {
        /// Listing the actor tried to modify.
        service_id: ServiceId,
        /// Rejected actor.
        actor: UserId,
    },

    /// A field failed validation.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServiceRepositoryError),
}

impl From<FieldError> for CatalogServiceError {
    fn from(err: FieldError) -> Self {
        Self::Domain(CatalogDomainError::Validation(err))
    }
}

impl CatalogServiceError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::Repository(ServiceRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::RoleNotPermitted { .. } | Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Domain(_) => ErrorKind::ValidationFailed,
            Self::Repository(ServiceRepositoryError::DuplicateService(_)) => ErrorKind::Conflict,
            Self::Repository(ServiceRepositoryError::Persistence(_)) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for catalog service operations.
pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// Catalog orchestration service.
#[derive(Clone)]
pub struct CatalogService<R, C>
where
    R: ServiceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CatalogService<R, C>
where
    R: ServiceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Publishes a listing owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::RoleNotPermitted`] for customers, a
    /// validation error for blank fields or a non-positive price, or a
    /// repository error.
    pub async fn create_service(
        &self,
        actor: &Actor,
        request: CreateServiceRequest,
    ) -> CatalogServiceResult<ServiceListing> {
        if !actor.role().can_list_services() {
            return Err(CatalogServiceError::RoleNotPermitted {
                actor: actor.id(),
                role: actor.role(),
            });
        }

        let listing = ServiceListing::new(
            actor.id(),
            required_text("title", &request.title)?,
            required_text("description", &request.description)?,
            required_text("category", &request.category)?,
            positive_price(request.price)?,
            clean_tags(request.tags),
            &*self.clock,
        );
        self.repository.store(&listing).await?;
        tracing::info!(service_id = %listing.id(), owner = %actor.id(), "service published");
        Ok(listing)
    }

    /// Applies an allow-listed update.
    ///
    /// Price edits never touch existing bookings, which keep their own
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`], [`CatalogServiceError::Forbidden`]
    /// unless the actor owns the listing or is an admin, or a validation
    /// error.
    pub async fn update_service(
        &self,
        service_id: ServiceId,
        actor: &Actor,
        request: UpdateServiceRequest,
    ) -> CatalogServiceResult<ServiceListing> {
        let mut listing = self.get_service(service_id).await?;
        if listing.owner() != actor.id() && actor.role() != Role::Admin {
            return Err(CatalogServiceError::Forbidden {
                service_id,
                actor: actor.id(),
            });
        }

        let edit = ListingEdit {
            title: request
                .title
                .map(|value| required_text("title", &value))
                .transpose()?,
            description: request
                .description
                .map(|value| required_text("description", &value))
                .transpose()?,
            category: request
                .category
                .map(|value| required_text("category", &value))
                .transpose()?,
            price: request.price.map(positive_price).transpose()?,
            tags: request.tags.map(clean_tags),
        };
        listing.apply_edit(edit, &*self.clock);
        self.repository.update(&listing).await?;
        tracing::info!(service_id = %service_id, "service updated");
        Ok(listing)
    }

    /// Retrieves a listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`] when the listing does not
    /// exist.
    pub async fn get_service(&self, service_id: ServiceId) -> CatalogServiceResult<ServiceListing> {
        self.repository
            .find_by_id(service_id)
            .await?
            .ok_or(CatalogServiceError::NotFound(service_id))
    }

    /// Lists listings matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the query fails.
    pub async fn list_services(
        &self,
        filter: &ServiceFilter,
    ) -> CatalogServiceResult<Vec<ServiceListing>> {
        Ok(self.repository.list(filter).await?)
    }
}

fn positive_price(price: Decimal) -> Result<Money, FieldError> {
    Money::new(price).map_err(|err| FieldError::new("price", err.to_string()))
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}
