//! Geographic location types.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A user's home location: city name plus coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HomeLocation {
    /// City name for display and coarse filtering.
    pub city: String,
    /// Coordinates used for nearby searches.
    pub coordinates: GeoPoint,
}

impl HomeLocation {
    /// Create a new home location.
    #[must_use]
    pub fn new(city: impl Into<String>, coordinates: GeoPoint) -> Self {
        Self {
            city: city.into(),
            coordinates,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_shape() {
        let loc = HomeLocation::new("Melbourne", GeoPoint::new(-37.81, 144.96));
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["city"], "Melbourne");
        assert!((json["coordinates"]["lat"].as_f64().unwrap() - -37.81).abs() < f64::EPSILON);
    }
}
