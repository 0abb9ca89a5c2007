//! Per-widget state

use crate::geo::Suggestion;
use crate::resolve::Resolution;
use serde::{Deserialize, Serialize};

/// Everything one mounted place input knows
///
/// Created empty on mount, discarded on unmount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    /// Text field contents; authoritative when no suggestion is active
    pub input_text: String,
    /// Result of the most recently issued fetch
    pub suggestions: Vec<Suggestion>,
    /// Highlighted suggestion; `None` means free text is authoritative
    pub active: Option<usize>,
    /// The user has focused or begun interacting; gates the dropdown
    pub interested: bool,
    /// Resolved location, when the widget owns it
    pub location: Resolution,
}

/// The interaction mode encoded by `interested` and `active`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dropdown hidden; navigation keys are inert
    Closed,
    /// Dropdown open, free text authoritative
    FreeText,
    /// Dropdown open with the given suggestion highlighted
    Active(usize),
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        match (self.interested, self.active) {
            (false, _) => Mode::Closed,
            (true, None) => Mode::FreeText,
            (true, Some(index)) => Mode::Active(index),
        }
    }

    /// Highlight index as `-1..len`, with `-1` for none
    pub fn active_index(&self) -> isize {
        self.active
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn active_suggestion(&self) -> Option<&Suggestion> {
        self.active.and_then(|i| self.suggestions.get(i))
    }

    /// What the text field shows: the active suggestion, else the typed text
    pub fn display_value(&self) -> &str {
        self.active_suggestion()
            .map_or(self.input_text.as_str(), |s| s.description.as_str())
    }

    pub fn dropdown_visible(&self) -> bool {
        self.interested && !self.suggestions.is_empty()
    }

    /// Replace the suggestion list, keeping the highlight in range
    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
        self.clamp_active();
    }

    /// Pull the highlight back inside the current list
    pub fn clamp_active(&mut self) {
        self.active = match (self.active, self.suggestions.len()) {
            (_, 0) | (None, _) => None,
            (Some(i), len) => Some(i.min(len - 1)),
        };
    }

    /// Move the highlight one row down, stopping at the last row
    pub fn move_down(&mut self) {
        let len = self.suggestions.len();
        self.active = match self.active {
            _ if len == 0 => None,
            None => Some(0),
            Some(i) => Some((i + 1).min(len - 1)),
        };
    }

    /// Move the highlight one row up, stopping at free text
    pub fn move_up(&mut self) {
        self.active = match self.active {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
        self.clamp_active();
    }
}
