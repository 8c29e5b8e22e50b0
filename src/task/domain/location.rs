//! Free-text locations and resolved coordinates.

use crate::validation::FieldError;
use serde::{Deserialize, Serialize};

/// Mean earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when either component is not finite or lies
    /// outside its valid range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, FieldError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(FieldError::new("lat", format!("out of range: {lat}")));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(FieldError::new("lng", format!("out of range: {lng}")));
        }
        Ok(Self { lat, lng })
    }

    /// Returns the latitude.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Returns the longitude.
    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    /// Returns the great-circle distance to `other` in kilometres.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "haversine distance is inherently floating point"
    )]
    pub fn distance_km(self, other: Self) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let half_chord = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
        EARTH_RADIUS_KM * angle
    }
}

/// Location as typed by the client plus its best-effort geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    text: String,
    coordinates: Option<Coordinates>,
}

impl Location {
    /// Creates a location. `coordinates` is `None` when geocoding failed.
    #[must_use]
    pub const fn new(text: String, coordinates: Option<Coordinates>) -> Self {
        Self { text, coordinates }
    }

    /// Returns the free-text location.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the resolved coordinates, if geocoding succeeded.
    #[must_use]
    pub const fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}
