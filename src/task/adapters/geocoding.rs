//! OpenStreetMap Nominatim geocoder.

use crate::{
    config::GeocoderConfig,
    task::{
        domain::Coordinates,
        ports::{GeocodeError, Geocoder},
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Geocoder backed by a Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// Builds a geocoder from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Request`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| GeocodeError::Request(Arc::new(err)))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let places = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| GeocodeError::Request(Arc::new(err)))?
            .json::<Vec<NominatimPlace>>()
            .await
            .map_err(|err| GeocodeError::InvalidResponse(err.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            tracing::debug!(location = query, "geocoder found no match");
            return Ok(None);
        };
        parse_place(&place).map(Some)
    }
}

fn parse_place(place: &NominatimPlace) -> Result<Coordinates, GeocodeError> {
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|err| GeocodeError::InvalidResponse(format!("lat: {err}")))?;
    let lng = place
        .lon
        .parse::<f64>()
        .map_err(|err| GeocodeError::InvalidResponse(format!("lon: {err}")))?;
    Coordinates::new(lat, lng).map_err(|err| GeocodeError::InvalidResponse(err.to_string()))
}
