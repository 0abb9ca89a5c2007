//! View renderers
//!
//! Provides trait-based rendering of a place input [`View`].

pub mod json;
pub mod text;

use crate::error::Result;
use crate::view::View;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for view renderers
pub trait ViewRenderer: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Render the view
    fn render(&self, view: &View) -> Result<String>;
}

/// Get a renderer by name
pub fn get_renderer(name: &str) -> Option<Box<dyn ViewRenderer>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonRenderer)),
        "text" => Some(Box::new(text::TextRenderer)),
        _ => None,
    }
}

/// List all available formats
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "text".to_string(),
            description: "Text field and dropdown, human readable".to_string(),
        },
        FormatInfo {
            name: "json".to_string(),
            description: "Full view as JSON".to_string(),
        },
    ]
}
