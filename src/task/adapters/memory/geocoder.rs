//! Table-driven geocoder for tests and offline use.

use crate::task::{
    domain::Coordinates,
    ports::{GeocodeError, Geocoder},
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Geocoder that answers from a fixed, case-insensitive lookup table.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, Coordinates>,
}

impl StaticGeocoder {
    /// Creates a geocoder that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a known location.
    #[must_use]
    pub fn with_entry(mut self, text: &str, coordinates: Coordinates) -> Self {
        self.entries.insert(normalize(text), coordinates);
        self
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.entries.get(&normalize(text)).copied())
    }
}
