//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default weighting radius in meters (0 = no local weighting)
pub const DEFAULT_RADIUS: f64 = 0.0;

/// Default weighting center latitude
pub const DEFAULT_CENTER_LAT: f64 = 0.0;

/// Default weighting center longitude
pub const DEFAULT_CENTER_LNG: f64 = 0.0;

/// Default place type filter
pub const DEFAULT_TYPES: &[&str] = &["geocode"];

/// Default input placeholder
pub const DEFAULT_PLACEHOLDER: &str = "Which place?";

/// Default provider backend
pub const DEFAULT_BACKEND: &str = "nominatim";

/// Default number of suggestions requested from the provider
pub const DEFAULT_LIMIT: usize = 5;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "place-input";
