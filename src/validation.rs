//! Field-level validation helpers shared by the entity domains.

use crate::{config::TextBounds, money::Money};
use rust_decimal::Decimal;
use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct FieldError {
    field: &'static str,
    reason: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Trims `value` and checks its character count against `bounds`.
///
/// # Errors
///
/// Returns [`FieldError`] when the trimmed length falls outside `bounds`.
pub fn bounded_text(
    field: &'static str,
    value: &str,
    bounds: TextBounds,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    let count = trimmed.chars().count();
    if !bounds.contains(count) {
        return Err(FieldError::new(
            field,
            format!(
                "must be {}-{} characters, got {count}",
                bounds.min_chars, bounds.max_chars
            ),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Trims `value` and rejects it when empty.
///
/// # Errors
///
/// Returns [`FieldError`] when nothing remains after trimming.
pub fn required_text(field: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    Ok(trimmed.to_owned())
}

/// Trims an optional value, dropping it when blank and enforcing a maximum.
///
/// # Errors
///
/// Returns [`FieldError`] when the trimmed value exceeds `max_chars`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, FieldError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let count = trimmed.chars().count();
    if count > max_chars {
        return Err(FieldError::new(
            field,
            format!("must be at most {max_chars} characters, got {count}"),
        ));
    }
    Ok(Some(trimmed.to_owned()))
}

/// Validates an amount against a configured minimum.
///
/// # Errors
///
/// Returns [`FieldError`] when `value` is below `minimum` or not positive.
pub fn minimum_amount(
    field: &'static str,
    value: Decimal,
    minimum: Decimal,
) -> Result<Money, FieldError> {
    if value < minimum {
        return Err(FieldError::new(
            field,
            format!("must be at least {minimum}, got {value}"),
        ));
    }
    Money::new(value).map_err(|err| FieldError::new(field, err.to_string()))
}
