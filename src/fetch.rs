//! Suggestion fetcher
//!
//! Turns input text plus weighting parameters into an ordered list of
//! candidate places. Provider order is relevance rank and is kept as-is.

use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::{Suggestion, SuggestionProvider, SuggestionRequest};
use crate::widget::WidgetOptions;
use tracing::debug;

/// Parameters that bias or restrict suggestions
#[derive(Debug, Clone, PartialEq)]
pub struct Weighting {
    pub center: Coordinates,
    pub radius: f64,
    pub country: Option<String>,
    pub types: Vec<String>,
}

impl From<&WidgetOptions> for Weighting {
    fn from(options: &WidgetOptions) -> Self {
        Self {
            center: options.center,
            radius: options.radius,
            country: options.country.clone(),
            types: options.types.clone(),
        }
    }
}

/// Fetches suggestions from a provider with fixed weighting
#[derive(Debug)]
pub struct SuggestionFetcher<P> {
    provider: P,
    weighting: Weighting,
}

impl<P: SuggestionProvider> SuggestionFetcher<P> {
    pub fn new(provider: P, weighting: Weighting) -> Self {
        Self {
            provider,
            weighting,
        }
    }

    pub fn weighting(&self) -> &Weighting {
        &self.weighting
    }

    /// Fetch suggestions for `text`
    ///
    /// Empty text yields an empty list without calling the provider.
    pub async fn fetch(&self, text: &str) -> Result<Vec<Suggestion>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let request = SuggestionRequest {
            text: text.to_string(),
            center: self.weighting.center,
            radius: self.weighting.radius,
            country: self.weighting.country.clone(),
            types: self.weighting.types.clone(),
        };

        let suggestions = self.provider.suggest(&request).await?;
        debug!(text, count = suggestions.len(), "suggestions fetched");
        Ok(suggestions)
    }
}
