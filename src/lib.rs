//! place-input: Place Autocomplete Input
//!
//! A text input backed by a place-suggestion service, with a keyboard- and
//! mouse-navigable dropdown, that resolves the chosen place (or free text)
//! into a geographic coordinate.
//!
//! ## Features
//!
//! - Selection state machine with explicit modes (closed, free text, active row)
//! - Last-issued-wins suggestion fetching, tagged with fetch tokens
//! - Resolved location that never loses a good answer to a failed attempt
//! - Observable state store with field-scoped accessors
//! - Nominatim (OpenStreetMap) and in-memory provider backends
//! - Text and JSON renderers, plus a line-driven CLI session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use place_input::geo::memory::MemoryBackend;
//! use place_input::widget::{Event, Key, PlaceInput, WidgetOptions};
//!
//! # async fn demo() -> place_input::Result<()> {
//! let backend = MemoryBackend::with_sample_places();
//! let mut input = PlaceInput::new(WidgetOptions::default(), backend.clone(), backend)?;
//!
//! input.handle(Event::Focus);
//! input.handle(Event::Change("10 Down".to_string()));
//! input.settle_all().await;
//!
//! input.handle(Event::KeyDown(Key::ArrowDown));
//! input.handle(Event::KeyDown(Key::Enter));
//! input.settle_all().await;
//!
//! println!("Resolved: {}", input.location());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod fetch;
pub mod format;
pub mod geo;
pub mod resolve;
pub mod store;
pub mod view;
pub mod widget;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use geo::{PlaceId, Query, Suggestion};
pub use resolve::Resolution;
pub use widget::{PlaceInput, WidgetOptions, WidgetState};
