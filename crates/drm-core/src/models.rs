//! Core data models for disaster zones, safe zones, and coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Longitude-first pair, as GeoJSON and the routing engine expect.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Build from a `[lat, lon]` pair as sent by API clients.
    pub fn from_lat_lon(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"`. Exactly two numeric fields are accepted; surrounding
/// whitespace on each field is ignored.
impl FromStr for GeoPoint {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(RoutingError::InvalidCoordinate(format!(
                "expected \"lat,lon\", got {s:?}"
            )));
        }
        let lat = parts[0].trim().parse::<f64>().map_err(|_| {
            RoutingError::InvalidCoordinate(format!("invalid latitude: {:?}", parts[0]))
        })?;
        let lon = parts[1].trim().parse::<f64>().map_err(|_| {
            RoutingError::InvalidCoordinate(format!("invalid longitude: {:?}", parts[1]))
        })?;
        Ok(Self { lat, lon })
    }
}

/// A circular area around an active incident that routes should avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterZone {
    #[serde(rename = "incident_id")]
    pub id: i64,
    #[serde(rename = "incident_name")]
    pub name: String,
    #[serde(rename = "latitude")]
    pub lat: f64,
    #[serde(rename = "longitude")]
    pub lon: f64,
    /// Radius in meters
    #[serde(rename = "radius")]
    pub radius_m: f64,
}

impl DisasterZone {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// A registered shelter or assembly point for a given incident category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    #[serde(rename = "zone_id")]
    pub id: i64,
    #[serde(rename = "zone_name")]
    pub name: String,
    #[serde(rename = "zone_lat")]
    pub lat: f64,
    #[serde(rename = "zone_lon")]
    pub lon: f64,
    pub incident_type_id: i64,
}

impl SafeZone {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Request to register a new safe zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSafeZone {
    pub zone_name: String,
    pub zone_lat: f64,
    pub zone_lon: f64,
    pub incident_type_id: i64,
}

impl NewSafeZone {
    /// Validate the payload.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.zone_name.trim().is_empty() {
            errors.push("zone_name must not be empty".to_string());
        }
        if !self.zone_lat.is_finite() || !(-90.0..=90.0).contains(&self.zone_lat) {
            errors.push(format!("zone_lat out of range: {}", self.zone_lat));
        }
        if !self.zone_lon.is_finite() || !(-180.0..=180.0).contains(&self.zone_lon) {
            errors.push(format!("zone_lon out of range: {}", self.zone_lon));
        }
        if self.incident_type_id <= 0 {
            errors.push("incident_type_id must be positive".to_string());
        }

        errors
    }
}
