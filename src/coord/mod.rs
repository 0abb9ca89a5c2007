//! Geographic coordinates
//!
//! The `{lat, lng}` value produced by resolving a place, plus the small
//! amount of geometry needed to weight suggestions towards a point.

use crate::constants::geo::METERS_PER_DEGREE_LAT;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A geographic coordinate (latitude, longitude)
///
/// Defaults to the origin `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Axis-aligned box in degrees: west, south, east, north
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Box enclosing the circle of `radius_meters` around this point
    ///
    /// Clamped to valid latitude/longitude ranges.
    pub fn bounding_box(&self, radius_meters: f64) -> BoundingBox {
        let delta_lat = radius_meters / METERS_PER_DEGREE_LAT;

        // Longitude degrees per meter varies with latitude
        let meters_per_deg_lng = METERS_PER_DEGREE_LAT * (self.lat * PI / 180.0).cos();
        let delta_lng = if meters_per_deg_lng > f64::EPSILON {
            radius_meters / meters_per_deg_lng
        } else {
            180.0
        };

        BoundingBox {
            min_lng: (self.lng - delta_lng).max(-180.0),
            min_lat: (self.lat - delta_lat).max(-90.0),
            max_lng: (self.lng + delta_lng).min(180.0),
            max_lat: (self.lat + delta_lat).min(90.0),
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}
