//! Selection state machine
//!
//! Interprets input events against the current [`WidgetState`] and returns
//! the side effects to perform. Nothing here touches the network: fetches
//! and resolutions are described as [`Effect`]s and their completions come
//! back through [`Machine::on_suggestions`].
//!
//! Fetches are tagged with a [`FetchToken`]. Only the completion carrying
//! the most recently issued token may write the suggestion list.

use crate::error::Result;
use crate::geo::{Query, Suggestion};
use crate::widget::state::{Mode, WidgetState};
use tracing::{debug, warn};

/// Keys the machine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    /// Any other keystroke; its text arrives as a `Change`
    Other,
}

/// Raw events from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    KeyDown(Key),
    /// The text field's contents changed
    Change(String),
    Focus,
    Blur,
    /// Mouse pressed on the suggestion row at this index
    RowMouseDown(usize),
}

/// Identifies one issued fetch; later fetches carry larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch suggestions for `text`, reporting back with `token`
    Fetch { token: FetchToken, text: String },
    /// Resolve a commit to a location
    Resolve(Query),
    /// Remove focus from the text field
    Blur,
}

/// Outcome of handling one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Suppress the host's default handling of the event
    pub prevent_default: bool,
    pub effects: Vec<Effect>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn prevented() -> Self {
        Self {
            prevent_default: true,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// True when this reaction asks for focus to be removed
    pub fn blurs(&self) -> bool {
        self.effects.contains(&Effect::Blur)
    }

    /// Number of resolutions this reaction starts
    pub fn resolves(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Resolve(_)))
            .count()
    }
}

/// The selection controller
///
/// Holds only the fetch sequence; all other state lives in `WidgetState`.
#[derive(Debug, Default)]
pub struct Machine {
    issued: u64,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the most recently issued fetch
    pub fn latest(&self) -> Option<FetchToken> {
        (self.issued > 0).then_some(FetchToken(self.issued))
    }

    /// Apply one input event
    pub fn on_event(&mut self, state: &mut WidgetState, event: Event) -> Reaction {
        match (state.mode(), event) {
            // Navigation is inert while closed, but still swallows the key
            (Mode::Closed, Event::KeyDown(Key::ArrowDown | Key::ArrowUp)) => Reaction::prevented(),
            (_, Event::KeyDown(Key::ArrowDown)) => {
                state.move_down();
                state.interested = true;
                Reaction::prevented()
            }
            (_, Event::KeyDown(Key::ArrowUp)) => {
                state.move_up();
                state.interested = true;
                Reaction::prevented()
            }

            // First Enter only shows interest
            (Mode::Closed, Event::KeyDown(Key::Enter)) => {
                state.interested = true;
                Reaction::prevented()
            }
            (Mode::FreeText, Event::KeyDown(Key::Enter)) => Self::commit_text(state),
            (Mode::Active(index), Event::KeyDown(Key::Enter)) => Self::commit_row(state, index),

            (_, Event::KeyDown(Key::Escape)) => Reaction::none().with(Effect::Blur),
            (_, Event::KeyDown(Key::Other)) | (_, Event::Focus) => {
                state.interested = true;
                Reaction::none()
            }
            (_, Event::Blur) => {
                state.interested = false;
                Reaction::none()
            }

            (_, Event::Change(text)) => self.refetch(state, text),
            (_, Event::RowMouseDown(index)) => Self::commit_row(state, index),
        }
    }

    /// Apply a settled fetch
    ///
    /// Returns `false` when the completion was superseded and dropped.
    /// A failed fetch clears the list.
    pub fn on_suggestions(
        &self,
        state: &mut WidgetState,
        token: FetchToken,
        result: Result<Vec<Suggestion>>,
    ) -> bool {
        if self.latest() != Some(token) {
            debug!(?token, latest = ?self.latest(), "discarding stale suggestions");
            return false;
        }

        match result {
            Ok(suggestions) => state.set_suggestions(suggestions),
            Err(e) => {
                warn!(?token, error = %e, "suggestion fetch failed");
                state.set_suggestions(Vec::new());
            }
        }
        true
    }

    /// New text invalidates the highlight and supersedes any in-flight fetch
    fn refetch(&mut self, state: &mut WidgetState, text: String) -> Reaction {
        self.issued += 1;
        let token = FetchToken(self.issued);

        state.active = None;
        state.input_text = text;

        if state.input_text.is_empty() {
            // Nothing to ask the provider; the list is known to be empty
            state.set_suggestions(Vec::new());
            return Reaction::none();
        }

        debug!(?token, text = %state.input_text, "fetch issued");
        Reaction::none().with(Effect::Fetch {
            token,
            text: state.input_text.clone(),
        })
    }

    fn commit_row(state: &mut WidgetState, index: usize) -> Reaction {
        let Some(suggestion) = state.suggestions.get(index) else {
            return Reaction::prevented();
        };

        let query = Query::ById(suggestion.id.clone());
        state.input_text = suggestion.description.clone();
        state.active = None;
        state.interested = false;

        Reaction::prevented().with(Effect::Resolve(query))
    }

    fn commit_text(state: &mut WidgetState) -> Reaction {
        state.interested = false;
        Reaction::prevented().with(Effect::Resolve(Query::ByAddress(state.input_text.clone())))
    }
}
