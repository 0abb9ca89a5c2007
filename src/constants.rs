//! Centralized constants for the place-input crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Meters per degree of latitude (approximate, varies slightly with latitude)
    pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// User agent sent to Nominatim (required by its usage policy)
    pub const USER_AGENT: &str = concat!("place-input/", env!("CARGO_PKG_VERSION"));
}

/// Place type filters
pub mod types {
    /// Broad category: any geocodable place, no provider-side layer restriction
    pub const GEOCODE: &str = "geocode";
}
