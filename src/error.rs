//! Error types for place-input

use thiserror::Error;

/// Main error type for place-input operations
#[derive(Error, Debug)]
pub enum Error {
    /// The suggestion provider failed (FetchFailure)
    #[error("Suggestion fetch failed: {0}")]
    Fetch(String),

    /// The geocoding provider reported a non-OK status (ResolutionFailure)
    #[error("Location resolution failed: {0}")]
    Resolution(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures of the suggestion provider
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// True for failures of the geocoding provider
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

/// Result type alias for place-input operations
pub type Result<T> = std::result::Result<T, Error>;
