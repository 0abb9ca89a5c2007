//! Presentation projection
//!
//! A [`View`] is everything a renderer needs to draw one place input. It is
//! computed from the widget state on demand and holds no state of its own.

use crate::resolve::Resolution;
use crate::widget::{WidgetOptions, WidgetState};
use serde::Serialize;

/// Class added to the highlighted row
pub const ACTIVE_CLASS: &str = "active";

/// One suggestion row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub index: usize,
    /// Display segments, in order
    pub terms: Vec<String>,
    /// Segments joined with ", "
    pub label: String,
    /// Category tags in provider order, plus `active` on the highlighted row
    pub classes: Vec<String>,
    pub active: bool,
}

/// Renderable snapshot of a place input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub input_text: String,
    /// What the text field shows
    pub display_value: String,
    pub placeholder: String,
    pub autofocus: bool,
    pub rows: Vec<Row>,
    pub dropdown_visible: bool,
    pub location: Resolution,
}

impl View {
    pub fn project(state: &WidgetState, location: Resolution, options: &WidgetOptions) -> Self {
        let rows = state
            .suggestions
            .iter()
            .enumerate()
            .map(|(index, suggestion)| {
                let active = state.active == Some(index);
                let terms: Vec<String> = suggestion.terms.iter().map(|t| t.value.clone()).collect();
                let mut classes = suggestion.category_tags.clone();
                if active {
                    classes.push(ACTIVE_CLASS.to_string());
                }
                Row {
                    index,
                    label: terms.join(", "),
                    terms,
                    classes,
                    active,
                }
            })
            .collect();

        Self {
            input_text: state.input_text.clone(),
            display_value: state.display_value().to_string(),
            placeholder: options.placeholder.clone(),
            autofocus: options.autofocus,
            rows,
            dropdown_visible: state.dropdown_visible(),
            location,
        }
    }
}
