//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/place-input/config.toml

pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, USER_AGENT};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::widget::WidgetOptions;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Widget construction options
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Suggestion/geocoding provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Widget construction options, as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Weighting radius in meters
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Weighting center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Weighting center longitude
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    /// Country restriction; empty means none
    #[serde(default)]
    pub country: String,

    /// Place type filter
    #[serde(default = "default_types")]
    pub types: Vec<String>,

    /// Input placeholder
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Focus the input on mount
    #[serde(default)]
    pub autofocus: bool,
}

/// Provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend name: "nominatim" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Nominatim base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// User agent sent with provider requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of suggestions requested per fetch
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_radius() -> f64 {
    DEFAULT_RADIUS
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_types() -> Vec<String> {
    DEFAULT_TYPES.iter().map(|t| t.to_string()).collect()
}
fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}
fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}
fn default_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            country: String::new(),
            types: default_types(),
            placeholder: default_placeholder(),
            autofocus: false,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_url(),
            user_agent: default_user_agent(),
            limit: default_limit(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["widget", "radius"] => Some(self.widget.radius.to_string()),
            ["widget", "center_lat"] => Some(self.widget.center_lat.to_string()),
            ["widget", "center_lng"] => Some(self.widget.center_lng.to_string()),
            ["widget", "country"] => Some(self.widget.country.clone()),
            ["widget", "types"] => Some(self.widget.types.join(",")),
            ["widget", "placeholder"] => Some(self.widget.placeholder.clone()),
            ["widget", "autofocus"] => Some(self.widget.autofocus.to_string()),

            ["provider", "backend"] => Some(self.provider.backend.clone()),
            ["provider", "url"] => Some(self.provider.url.clone()),
            ["provider", "user_agent"] => Some(self.provider.user_agent.clone()),
            ["provider", "limit"] => Some(self.provider.limit.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["widget", "radius"] => {
                self.widget.radius = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid radius value: {}", value))
                })?;
            }
            ["widget", "center_lat"] => {
                self.widget.center_lat = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid latitude value: {}", value))
                })?;
            }
            ["widget", "center_lng"] => {
                self.widget.center_lng = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid longitude value: {}", value))
                })?;
            }
            ["widget", "country"] => {
                self.widget.country = value.to_string();
            }
            ["widget", "types"] => {
                self.widget.types = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ["widget", "placeholder"] => {
                self.widget.placeholder = value.to_string();
            }
            ["widget", "autofocus"] => {
                self.widget.autofocus = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }

            ["provider", "backend"] => {
                self.provider.backend = value.to_string();
            }
            ["provider", "url"] => {
                self.provider.url = value.to_string();
            }
            ["provider", "user_agent"] => {
                self.provider.user_agent = value.to_string();
            }
            ["provider", "limit"] => {
                self.provider.limit = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid limit value: {}", value))
                })?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "widget.radius",
            "widget.center_lat",
            "widget.center_lng",
            "widget.country",
            "widget.types",
            "widget.placeholder",
            "widget.autofocus",
            "provider.backend",
            "provider.url",
            "provider.user_agent",
            "provider.limit",
            "output.format",
        ]
    }

    /// Widget construction options described by this config
    pub fn widget_options(&self) -> WidgetOptions {
        let country = Some(self.widget.country.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        WidgetOptions {
            radius: self.widget.radius,
            center: Coordinates::new(self.widget.center_lat, self.widget.center_lng),
            country,
            types: self.widget.types.clone(),
            placeholder: self.widget.placeholder.clone(),
            autofocus: self.widget.autofocus,
        }
    }
}
