//! Error types for catalog validation.

use crate::validation::FieldError;
use thiserror::Error;

/// Errors returned by catalog domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] FieldError),
}
