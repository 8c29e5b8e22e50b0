//! Runtime configuration for marketplace services.
//!
//! Every section has defaults matching the production limits, so an empty
//! document is a valid configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Inclusive character-count bounds for a trimmed text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TextBounds {
    /// Minimum number of characters after trimming.
    pub min_chars: usize,
    /// Maximum number of characters after trimming.
    pub max_chars: usize,
}

impl TextBounds {
    /// Creates bounds from explicit limits.
    #[must_use]
    pub const fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    /// Returns whether `count` lies within the bounds.
    #[must_use]
    pub const fn contains(self, count: usize) -> bool {
        count >= self.min_chars && count <= self.max_chars
    }
}

/// Field limits applied when creating or editing tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskLimits {
    /// Title length bounds.
    pub title: TextBounds,
    /// Description length bounds.
    pub description: TextBounds,
    /// Free-text location length bounds.
    pub location: TextBounds,
    /// Smallest accepted budget.
    pub min_budget: Decimal,
}

impl Default for TaskLimits {
    fn default() -> Self {
        Self {
            title: TextBounds::new(3, 100),
            description: TextBounds::new(10, 1000),
            location: TextBounds::new(3, 200),
            min_budget: Decimal::ONE,
        }
    }
}

/// Field limits applied when submitting offers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OfferLimits {
    /// Message length bounds.
    pub message: TextBounds,
    /// Smallest accepted proposed price.
    pub min_price: Decimal,
    /// Longest accepted proposed time window.
    pub max_time_window_chars: usize,
}

impl Default for OfferLimits {
    fn default() -> Self {
        Self {
            message: TextBounds::new(10, 500),
            min_price: Decimal::ONE,
            max_time_window_chars: 100,
        }
    }
}

/// Field limits applied when creating bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookingLimits {
    /// Longest accepted booking note.
    pub max_notes_chars: usize,
}

impl Default for BookingLimits {
    fn default() -> Self {
        Self {
            max_notes_chars: 1000,
        }
    }
}

/// Field limits applied when writing listing reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewLimits {
    /// Longest accepted review text.
    pub max_text_chars: usize,
}

impl Default for ReviewLimits {
    fn default() -> Self {
        Self {
            max_text_chars: 2000,
        }
    }
}

/// Settings for the HTTP geocoder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint of an OpenStreetMap Nominatim instance.
    pub base_url: String,
    /// User agent sent with every request, as the public instance requires.
    pub user_agent: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_owned(),
            user_agent: "skillmarket/0.1".to_owned(),
            timeout_ms: 5_000,
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Task field limits.
    pub task: TaskLimits,
    /// Offer field limits.
    pub offer: OfferLimits,
    /// Booking field limits.
    pub booking: BookingLimits,
    /// Review field limits.
    pub review: ReviewLimits,
    /// Geocoder settings.
    pub geocoder: GeocoderConfig,
}

impl MarketplaceConfig {
    /// Parses a TOML document, filling omitted keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be deserialized.
    #[error("invalid marketplace configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
