//! In-memory gazetteer backend
//!
//! Answers suggestions and geocoding from a fixed list of places, with no
//! network access. Useful offline and as a deterministic provider.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{Geocoder, PlaceId, Suggestion, SuggestionProvider, SuggestionRequest};
use std::sync::Arc;

/// A place known to the gazetteer
#[derive(Debug, Clone)]
pub struct MemoryPlace {
    pub suggestion: Suggestion,
    pub location: Coordinates,
    /// ISO 3166-1 alpha-2 code, lowercase
    pub country: Option<String>,
}

impl MemoryPlace {
    pub fn new(suggestion: Suggestion, location: Coordinates) -> Self {
        Self {
            suggestion,
            location,
            country: None,
        }
    }

    pub fn in_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into().to_lowercase());
        self
    }

    /// Any term, or the whole description, starts with `needle` (already lowercased)
    fn matches(&self, needle: &str) -> bool {
        self.suggestion.description.to_lowercase().starts_with(needle)
            || self
                .suggestion
                .terms
                .iter()
                .any(|t| t.value.to_lowercase().starts_with(needle))
    }
}

/// Gazetteer backend
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    places: Arc<Vec<MemoryPlace>>,
}

impl MemoryBackend {
    /// Create a backend over the given places, kept in the given order
    pub fn new(places: Vec<MemoryPlace>) -> Self {
        Self {
            places: Arc::new(places),
        }
    }

    /// A small built-in set of well-known places
    pub fn with_sample_places() -> Self {
        Self::new(vec![
            MemoryPlace::new(
                Suggestion::new("p1", "10 Downing Street, London, United Kingdom")
                    .with_tags(["route"]),
                Coordinates::new(51.5034, -0.1276),
            )
            .in_country("gb"),
            MemoryPlace::new(
                Suggestion::new("p2", "London, United Kingdom").with_tags(["locality", "political"]),
                Coordinates::new(51.5074, -0.1278),
            )
            .in_country("gb"),
            MemoryPlace::new(
                Suggestion::new("p3", "Paris, France").with_tags(["locality", "political"]),
                Coordinates::new(48.8566, 2.3522),
            )
            .in_country("fr"),
            MemoryPlace::new(
                Suggestion::new("p4", "Brandenburg Gate, Pariser Platz, Berlin, Germany")
                    .with_tags(["tourist_attraction", "point_of_interest"]),
                Coordinates::new(52.5163, 13.3777),
            )
            .in_country("de"),
            MemoryPlace::new(
                Suggestion::new("p5", "Wellington, New Zealand").with_tags(["locality", "political"]),
                Coordinates::new(-41.2866, 174.7756),
            )
            .in_country("nz"),
            MemoryPlace::new(
                Suggestion::new("p6", "Downtown, Los Angeles, CA, USA")
                    .with_tags(["neighborhood", "political"]),
                Coordinates::new(34.0407, -118.2468),
            )
            .in_country("us"),
        ])
    }

    pub fn places(&self) -> &[MemoryPlace] {
        &self.places
    }
}

impl SuggestionProvider for MemoryBackend {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>> {
        let needle = request.text.trim().to_lowercase();
        let country = request
            .country
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .places
            .iter()
            .filter(|p| match &country {
                Some(code) => p.country.as_deref() == Some(code.as_str()),
                None => true,
            })
            .filter(|p| p.matches(&needle))
            .map(|p| p.suggestion.clone())
            .collect())
    }
}

impl Geocoder for MemoryBackend {
    async fn resolve_id(&self, id: &PlaceId) -> Result<Coordinates> {
        self.places
            .iter()
            .find(|p| &p.suggestion.id == id)
            .map(|p| p.location)
            .ok_or_else(|| Error::Resolution(format!("NOT_FOUND: {}", id)))
    }

    async fn resolve_address(&self, text: &str) -> Result<Coordinates> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::Resolution("INVALID_REQUEST: empty address".to_string()));
        }

        let exact = self
            .places
            .iter()
            .find(|p| p.suggestion.description.to_lowercase() == needle);

        exact
            .or_else(|| self.places.iter().find(|p| p.matches(&needle)))
            .map(|p| p.location)
            .ok_or_else(|| Error::Resolution(format!("ZERO_RESULTS for '{}'", text)))
    }
}
