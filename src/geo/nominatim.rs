//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for both place suggestions and geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::config::ProviderConfig;
use crate::constants::types::GEOCODE;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{split_terms, Geocoder, PlaceId, Suggestion, SuggestionProvider, SuggestionRequest};
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

/// Nominatim search/lookup response item (format=jsonv2)
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    osm_type: String,
    osm_id: u64,
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(rename = "type", default)]
    place_type: Option<String>,
}

impl NominatimPlace {
    /// `N123`, `W123` or `R123`, the form `/lookup` accepts
    fn place_id(&self) -> PlaceId {
        let prefix = self
            .osm_type
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('N');
        PlaceId(format!("{}{}", prefix, self.osm_id))
    }

    fn into_suggestion(self) -> Suggestion {
        let id = self.place_id();
        let terms = split_terms(&self.display_name);
        let category_tags = [self.category, self.place_type]
            .into_iter()
            .flatten()
            .collect();
        Suggestion {
            id,
            description: self.display_name,
            terms,
            category_tags,
        }
    }
}

impl NominatimBackend {
    /// Create a new Nominatim backend with default settings
    pub fn new() -> Result<Self> {
        Self::from_config(&ProviderConfig::default())
    }

    /// Create a backend from provider settings
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Parse lat/lng strings to coordinates
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinates> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Resolution(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Resolution(format!("Invalid longitude: {}", lng)))?;
        Ok(Coordinates::new(lat, lng))
    }

    /// Build the autocomplete search URL for a request
    fn search_url(&self, request: &SuggestionRequest) -> String {
        let mut url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=0&limit={}",
            self.base_url,
            urlencoding::encode(&request.text),
            self.limit
        );

        if let Some(country) = request.country.as_deref().filter(|c| !c.is_empty()) {
            url.push_str(&format!("&countrycodes={}", urlencoding::encode(country)));
        }

        // An unbounded viewbox only weights results towards the area
        if request.radius > 0.0 {
            let bbox = request.center.bounding_box(request.radius);
            url.push_str(&format!(
                "&viewbox={},{},{},{}",
                bbox.min_lng, bbox.max_lat, bbox.max_lng, bbox.min_lat
            ));
        }

        let layers: Vec<&str> = request
            .types
            .iter()
            .map(String::as_str)
            .filter(|t| !t.eq_ignore_ascii_case(GEOCODE))
            .collect();
        if !layers.is_empty() {
            url.push_str(&format!("&layer={}", urlencoding::encode(&layers.join(","))));
        }

        url
    }

    fn lookup_url(&self, id: &PlaceId) -> String {
        format!(
            "{}/lookup?osm_ids={}&format=jsonv2",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }

    fn geocode_url(&self, text: &str) -> String {
        format!(
            "{}/search?q={}&format=jsonv2&limit=1",
            self.base_url,
            urlencoding::encode(text)
        )
    }

    /// GET a JSON array of places
    ///
    /// `fail` wraps the message in the error class of the calling operation.
    async fn get_places(&self, url: &str, fail: fn(String) -> Error) -> Result<Vec<NominatimPlace>> {
        debug!(url, "nominatim request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(fail(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| fail(format!("Failed to parse Nominatim response: {}", e)))
    }

    fn first_location(places: Vec<NominatimPlace>, query: &str) -> Result<Coordinates> {
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| Error::Resolution(format!("ZERO_RESULTS for {}", query)))?;
        Self::parse_coords(&place.lat, &place.lon)
    }
}

impl SuggestionProvider for NominatimBackend {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>> {
        let places = self.get_places(&self.search_url(request), Error::Fetch).await?;
        Ok(places.into_iter().map(NominatimPlace::into_suggestion).collect())
    }
}

impl Geocoder for NominatimBackend {
    async fn resolve_id(&self, id: &PlaceId) -> Result<Coordinates> {
        let places = self.get_places(&self.lookup_url(id), Error::Resolution).await?;
        Self::first_location(places, id.as_str())
    }

    async fn resolve_address(&self, text: &str) -> Result<Coordinates> {
        let places = self.get_places(&self.geocode_url(text), Error::Resolution).await?;
        Self::first_location(places, text)
    }
}
