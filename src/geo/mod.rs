//! Place providers
//!
//! Types shared by the suggestion and geocoding providers, the provider
//! traits, and the concrete backends (Nominatim over HTTP, an in-memory
//! gazetteer for offline use).

pub mod memory;
pub mod nominatim;

use crate::config::ProviderConfig;
use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Opaque, stable identifier of a place, as issued by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One display segment of a suggestion (street, city, country...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub value: String,
}

impl Term {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A candidate place returned by the suggestion provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable key for resolving to a location
    pub id: PlaceId,
    /// Full display text
    pub description: String,
    /// Description broken into display segments
    pub terms: Vec<Term>,
    /// Classification tags, in provider order
    pub category_tags: Vec<String>,
}

impl Suggestion {
    /// Create a suggestion whose terms are the comma-separated parts of `description`
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        let terms = split_terms(&description);
        Self {
            id: PlaceId::new(id),
            description,
            terms,
            category_tags: Vec::new(),
        }
    }

    /// Replace the display segments
    pub fn with_terms<I, T>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.terms = terms.into_iter().map(Term::new).collect();
        self
    }

    /// Replace the category tags
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.category_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Split a display string into its comma-joined segments
pub fn split_terms(description: &str) -> Vec<Term> {
    description
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Term::new)
        .collect()
}

/// Request sent to a suggestion provider
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    /// The text typed so far (never empty)
    pub text: String,
    /// Results are weighted towards this point
    pub center: Coordinates,
    /// Weighting radius in meters (0 = no local weighting)
    pub radius: f64,
    /// Restrict results to this country code
    pub country: Option<String>,
    /// Place type filter
    pub types: Vec<String>,
}

/// What to resolve into a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// A specific suggestion, by its place id
    ById(PlaceId),
    /// Free-form address text
    ByAddress(String),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "place {}", id),
            Self::ByAddress(text) => write!(f, "address '{}'", text),
        }
    }
}

/// Trait for place suggestion (autocomplete) backends
pub trait SuggestionProvider: Send + Sync {
    /// Candidate places for the request, ordered by relevance
    fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> impl std::future::Future<Output = Result<Vec<Suggestion>>> + Send;
}

/// Trait for geocoding backends
///
/// Both operations fail with `Error::Resolution` when the provider reports
/// anything other than an OK status with at least one result.
pub trait Geocoder: Send + Sync {
    /// Resolve a place id to its coordinates
    fn resolve_id(&self, id: &PlaceId) -> impl std::future::Future<Output = Result<Coordinates>> + Send;

    /// Geocode free-form address text
    fn resolve_address(&self, text: &str) -> impl std::future::Future<Output = Result<Coordinates>> + Send;
}

/// A backend chosen by name at runtime
///
/// The provider traits are not object safe, so runtime selection is an enum.
#[derive(Debug, Clone)]
pub enum Backend {
    Nominatim(nominatim::NominatimBackend),
    Memory(memory::MemoryBackend),
}

impl Backend {
    /// Build the backend named in the provider config
    ///
    /// Unrecognized names fall back to Nominatim, with a warning.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config.backend.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory(memory::MemoryBackend::with_sample_places())),
            "nominatim" => Ok(Self::Nominatim(nominatim::NominatimBackend::from_config(config)?)),
            other => {
                warn!(backend = other, "unknown backend, falling back to nominatim");
                Ok(Self::Nominatim(nominatim::NominatimBackend::from_config(config)?))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nominatim(_) => "nominatim",
            Self::Memory(_) => "memory",
        }
    }
}

impl SuggestionProvider for Backend {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>> {
        match self {
            Self::Nominatim(b) => b.suggest(request).await,
            Self::Memory(b) => b.suggest(request).await,
        }
    }
}

impl Geocoder for Backend {
    async fn resolve_id(&self, id: &PlaceId) -> Result<Coordinates> {
        match self {
            Self::Nominatim(b) => b.resolve_id(id).await,
            Self::Memory(b) => b.resolve_id(id).await,
        }
    }

    async fn resolve_address(&self, text: &str) -> Result<Coordinates> {
        match self {
            Self::Nominatim(b) => b.resolve_address(text).await,
            Self::Memory(b) => b.resolve_address(text).await,
        }
    }
}

/// List the available backend names with descriptions
pub fn available_backends() -> Vec<(&'static str, &'static str)> {
    vec![
        ("nominatim", "OpenStreetMap Nominatim (network)"),
        ("memory", "Built-in gazetteer of sample places (offline)"),
    ]
}
