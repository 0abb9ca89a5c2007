//! Place input widget
//!
//! [`PlaceInput`] ties the pieces together: it owns the widget's state
//! store, runs events through the selection [`Machine`], starts provider
//! calls for the effects the machine asks for, and applies their
//! completions when the owner settles them.
//!
//! All state changes happen on the caller's side of `handle`, `settle_next`
//! and `pump`. Provider calls run as tokio tasks and only report back over
//! a channel, so no two mutations ever overlap.

pub mod machine;
pub mod state;

pub use machine::{Effect, Event, FetchToken, Key, Machine, Reaction};
pub use state::{Mode, WidgetState};

use crate::config::defaults::{DEFAULT_PLACEHOLDER, DEFAULT_TYPES};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::fetch::{SuggestionFetcher, Weighting};
use crate::geo::{Geocoder, Query, Suggestion, SuggestionProvider};
use crate::resolve::{LocationResolver, Resolution};
use crate::store::{Accessor, Store};
use crate::view::View;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Options accepted by the widget at construction
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    /// Weighting radius in meters (0 = no local weighting)
    pub radius: f64,
    /// Results are weighted towards this point
    pub center: Coordinates,
    /// Restrict results to this country
    pub country: Option<String>,
    /// Place type filter
    pub types: Vec<String>,
    pub placeholder: String,
    pub autofocus: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            radius: 0.0,
            center: Coordinates::default(),
            country: None,
            types: DEFAULT_TYPES.iter().map(|t| t.to_string()).collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            autofocus: false,
        }
    }
}

impl WidgetOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::InvalidRadius(format!(
                "Radius must be a non-negative number of meters, got {}",
                self.radius
            )));
        }
        self.center.validate()
    }
}

/// A provider call that has finished
#[derive(Debug)]
enum Settled {
    Suggestions {
        token: FetchToken,
        result: Result<Vec<Suggestion>>,
    },
    Location(Result<Coordinates>),
}

/// One mounted place input
pub struct PlaceInput<P, G> {
    options: WidgetOptions,
    state: Store<WidgetState>,
    location: Arc<dyn Accessor<Resolution>>,
    /// The location cell is a field of `state`
    owns_location: bool,
    machine: Machine,
    fetcher: Arc<SuggestionFetcher<P>>,
    resolver: Arc<LocationResolver<G>>,
    tx: mpsc::UnboundedSender<Settled>,
    rx: mpsc::UnboundedReceiver<Settled>,
    in_flight: usize,
}

impl<P, G> std::fmt::Debug for PlaceInput<P, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceInput")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<P, G> PlaceInput<P, G>
where
    P: SuggestionProvider + 'static,
    G: Geocoder + 'static,
{
    /// Mount a widget with empty state
    ///
    /// The resolved location is kept in the widget's own state.
    pub fn new(options: WidgetOptions, provider: P, geocoder: G) -> Result<Self> {
        options.validate()?;

        let state = Store::new(WidgetState::new());
        let location = Arc::new(state.field(|s| &s.location, |s| &mut s.location));
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            fetcher: Arc::new(SuggestionFetcher::new(provider, Weighting::from(&options))),
            resolver: Arc::new(LocationResolver::new(geocoder)),
            options,
            state,
            location,
            owns_location: true,
            machine: Machine::new(),
            tx,
            rx,
            in_flight: 0,
        })
    }

    /// Keep the resolved location in a cell owned by someone else
    pub fn with_location(mut self, location: Arc<dyn Accessor<Resolution>>) -> Self {
        self.location = location;
        self.owns_location = false;
        self
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    /// The widget's state store, for observers
    pub fn store(&self) -> &Store<WidgetState> {
        &self.state
    }

    pub fn state(&self) -> WidgetState {
        self.state.get()
    }

    pub fn location(&self) -> Resolution {
        self.location.get()
    }

    /// Number of provider calls not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Current projection for the renderer
    pub fn view(&self) -> View {
        // The location may be a field of this same store; read it first
        let location = self.location.get();
        self.state
            .read(|state| View::project(state, location, &self.options))
    }

    /// Apply one input event and start any provider calls it needs
    ///
    /// A commit reaches observers as a single write. When the location cell
    /// is the widget's own, it turns pending in that same write.
    pub fn handle(&mut self, event: Event) -> Reaction {
        let machine = &mut self.machine;
        let owns_location = self.owns_location;
        let reaction = self.state.merge(|state| {
            let reaction = machine.on_event(state, event);
            if owns_location {
                for _ in 0..reaction.resolves() {
                    state.location = state.location.begin();
                }
            }
            reaction
        });

        for effect in &reaction.effects {
            match effect {
                Effect::Fetch { token, text } => self.spawn_fetch(*token, text.clone()),
                Effect::Resolve(query) => self.spawn_resolve(query.clone()),
                Effect::Blur => {}
            }
        }
        reaction
    }

    /// Wait for the next provider call to finish and apply it
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(settled) => {
                self.apply(settled);
                true
            }
            None => false,
        }
    }

    /// Wait for every in-flight call and apply them in completion order
    pub async fn settle_all(&mut self) {
        while self.settle_next().await {}
    }

    /// Apply the calls that have already finished, without waiting
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(settled) = self.rx.try_recv() {
            self.apply(settled);
            applied += 1;
        }
        applied
    }

    fn spawn_fetch(&mut self, token: FetchToken, text: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = fetcher.fetch(&text).await;
            // The widget may have been unmounted meanwhile
            let _ = tx.send(Settled::Suggestions { token, result });
        });
    }

    fn spawn_resolve(&mut self, query: Query) {
        if !self.owns_location {
            self.location.set(self.location.get().begin());
        }

        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = resolver.resolve(&query).await;
            let _ = tx.send(Settled::Location(result));
        });
    }

    fn apply(&mut self, settled: Settled) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match settled {
            Settled::Suggestions { token, result } => {
                let machine = &self.machine;
                self.state
                    .merge(|state| machine.on_suggestions(state, token, result));
            }
            Settled::Location(result) => {
                if let Err(e) = &result {
                    warn!(error = %e, "location resolution failed, keeping previous location");
                }
                self.location.set(self.location.get().settle(&result));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::memory::MemoryBackend;
    use crate::geo::{PlaceId, SuggestionRequest};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Gate<T> = oneshot::Receiver<Result<T>>;

    /// Provider whose answers are released by the test, one call at a time
    #[derive(Default)]
    struct GatedProvider {
        suggestions: Mutex<HashMap<String, Gate<Vec<Suggestion>>>>,
        locations: Mutex<HashMap<String, Gate<Coordinates>>>,
        calls: Mutex<Vec<String>>,
    }

    impl GatedProvider {
        fn gate_suggestions(&self, text: &str) -> oneshot::Sender<Result<Vec<Suggestion>>> {
            let (tx, rx) = oneshot::channel();
            self.suggestions.lock().unwrap().insert(text.to_string(), rx);
            tx
        }

        fn gate_location(&self, key: &str) -> oneshot::Sender<Result<Coordinates>> {
            let (tx, rx) = oneshot::channel();
            self.locations.lock().unwrap().insert(key.to_string(), rx);
            tx
        }

        async fn wait<T>(gates: &Mutex<HashMap<String, Gate<T>>>, key: &str) -> Result<T> {
            let gate = gates.lock().unwrap().remove(key);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(Error::Fetch("gate dropped".to_string()))),
                None => Err(Error::Fetch(format!("no gate for {}", key))),
            }
        }
    }

    impl SuggestionProvider for Arc<GatedProvider> {
        async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>> {
            self.calls.lock().unwrap().push(format!("suggest:{}", request.text));
            GatedProvider::wait(&self.suggestions, &request.text).await
        }
    }

    impl Geocoder for Arc<GatedProvider> {
        async fn resolve_id(&self, id: &PlaceId) -> Result<Coordinates> {
            self.calls.lock().unwrap().push(format!("id:{}", id));
            GatedProvider::wait(&self.locations, id.as_str()).await
        }

        async fn resolve_address(&self, text: &str) -> Result<Coordinates> {
            self.calls.lock().unwrap().push(format!("address:{}", text));
            GatedProvider::wait(&self.locations, text).await
        }
    }

    fn gated() -> (Arc<GatedProvider>, PlaceInput<Arc<GatedProvider>, Arc<GatedProvider>>) {
        let provider = Arc::new(GatedProvider::default());
        let widget = PlaceInput::new(
            WidgetOptions::default(),
            Arc::clone(&provider),
            Arc::clone(&provider),
        )
        .unwrap();
        (provider, widget)
    }

    fn type_text<P, G>(widget: &mut PlaceInput<P, G>, text: &str)
    where
        P: SuggestionProvider + 'static,
        G: Geocoder + 'static,
    {
        widget.handle(Event::KeyDown(Key::Other));
        widget.handle(Event::Change(text.to_string()));
    }

    fn downing() -> Suggestion {
        Suggestion::new("p1", "10 Downing Street, London")
            .with_terms(["10 Downing Street", "London"])
            .with_tags(["route"])
    }

    #[test]
    fn test_options_validate() {
        assert!(WidgetOptions::default().validate().is_ok());

        let options = WidgetOptions {
            radius: -1.0,
            ..WidgetOptions::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidRadius(_))));

        let options = WidgetOptions {
            center: Coordinates::new(91.0, 0.0),
            ..WidgetOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_mount_rejects_invalid_options() {
        let options = WidgetOptions {
            radius: f64::NAN,
            ..WidgetOptions::default()
        };
        let backend = MemoryBackend::with_sample_places();
        assert!(PlaceInput::new(options, backend.clone(), backend).is_err());
    }

    #[tokio::test]
    async fn test_downing_street_end_to_end() {
        let (provider, mut widget) = gated();

        let suggestions = provider.gate_suggestions("10 Down");
        widget.handle(Event::Focus);
        type_text(&mut widget, "10 Down");
        suggestions.send(Ok(vec![downing()])).unwrap();
        assert!(widget.settle_next().await);

        widget.handle(Event::KeyDown(Key::ArrowDown));
        assert_eq!(widget.view().display_value, "10 Downing Street, London");

        let location = provider.gate_location("p1");
        widget.handle(Event::KeyDown(Key::Enter));

        // Text is committed before the coordinate arrives
        let state = widget.state();
        assert_eq!(state.input_text, "10 Downing Street, London");
        assert_eq!(state.active_index(), -1);
        assert!(!state.interested);
        assert!(widget.location().is_pending());

        location.send(Ok(Coordinates::new(51.5034, -0.1276))).unwrap();
        widget.settle_all().await;
        assert_eq!(
            widget.location(),
            Resolution::Resolved(Coordinates::new(51.5034, -0.1276))
        );
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["suggest:10 Down", "id:p1"]
        );
    }

    #[tokio::test]
    async fn test_last_issued_fetch_wins() {
        let (provider, mut widget) = gated();
        widget.handle(Event::Focus);

        let first = provider.gate_suggestions("Lo");
        let second = provider.gate_suggestions("Lon");
        type_text(&mut widget, "Lo");
        type_text(&mut widget, "Lon");
        assert_eq!(widget.in_flight(), 2);

        // The newer fetch settles first
        second.send(Ok(vec![Suggestion::new("p2", "London")])).unwrap();
        assert!(widget.settle_next().await);
        first
            .send(Ok(vec![
                Suggestion::new("x", "Lowestoft"),
                Suggestion::new("y", "Lowell"),
            ]))
            .unwrap();
        assert!(widget.settle_next().await);

        let state = widget.state();
        assert_eq!(state.suggestions.len(), 1);
        assert_eq!(state.suggestions[0].description, "London");
        assert!(!widget.settle_next().await);
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_suggestions() {
        let (provider, mut widget) = gated();
        widget.handle(Event::Focus);

        let ok = provider.gate_suggestions("Pa");
        type_text(&mut widget, "Pa");
        ok.send(Ok(vec![Suggestion::new("p3", "Paris, France")])).unwrap();
        widget.settle_all().await;
        assert!(widget.view().dropdown_visible);

        let failing = provider.gate_suggestions("Par");
        type_text(&mut widget, "Par");
        failing
            .send(Err(Error::Fetch("UNKNOWN_ERROR".to_string())))
            .unwrap();
        widget.settle_all().await;

        assert!(widget.state().suggestions.is_empty());
        assert!(!widget.view().dropdown_visible);
    }

    #[tokio::test]
    async fn test_empty_text_never_calls_provider() {
        let (provider, mut widget) = gated();
        widget.handle(Event::Focus);
        type_text(&mut widget, "");

        assert_eq!(widget.in_flight(), 0);
        assert!(widget.state().suggestions.is_empty());
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_free_text_keeps_previous_location() {
        let (provider, mut widget) = gated();
        let london = Coordinates::new(51.5074, -0.1278);

        widget.handle(Event::Focus);
        let suggestions = provider.gate_suggestions("Lon");
        type_text(&mut widget, "Lon");
        suggestions
            .send(Ok(vec![Suggestion::new("p2", "London")]))
            .unwrap();
        widget.settle_all().await;

        let location = provider.gate_location("p2");
        widget.handle(Event::RowMouseDown(0));
        location.send(Ok(london)).unwrap();
        widget.settle_all().await;
        assert_eq!(widget.location(), Resolution::Resolved(london));

        // Reopen, type something unknown, commit the free text
        widget.handle(Event::Focus);
        let none = provider.gate_suggestions("Nowhereville");
        type_text(&mut widget, "Nowhereville");
        none.send(Ok(Vec::new())).unwrap();
        widget.settle_all().await;

        let failing = provider.gate_location("Nowhereville");
        widget.handle(Event::KeyDown(Key::Enter));
        failing
            .send(Err(Error::Resolution("ZERO_RESULTS".to_string())))
            .unwrap();
        widget.settle_all().await;

        assert_eq!(widget.location(), Resolution::Resolved(london));
        assert!(provider
            .calls
            .lock()
            .unwrap()
            .contains(&"address:Nowhereville".to_string()));
    }

    #[tokio::test]
    async fn test_failed_resolution_from_unset_stays_unset() {
        let backend = MemoryBackend::with_sample_places();
        let mut widget =
            PlaceInput::new(WidgetOptions::default(), backend.clone(), backend).unwrap();

        widget.handle(Event::Focus);
        type_text(&mut widget, "Nowhereville");
        widget.settle_all().await;
        assert!(widget.state().suggestions.is_empty());

        widget.handle(Event::KeyDown(Key::Enter));
        widget.settle_all().await;
        assert_eq!(widget.location(), Resolution::Unset);
    }

    #[tokio::test]
    async fn test_external_location_cell() {
        let backend = MemoryBackend::with_sample_places();
        let shared: Store<Resolution> = Store::new(Resolution::Unset);

        let mut first = PlaceInput::new(WidgetOptions::default(), backend.clone(), backend.clone())
            .unwrap()
            .with_location(Arc::new(shared.clone()));
        let mut second = PlaceInput::new(WidgetOptions::default(), backend.clone(), backend)
            .unwrap()
            .with_location(Arc::new(shared.clone()));

        first.handle(Event::Focus);
        type_text(&mut first, "Paris");
        first.settle_all().await;
        first.handle(Event::RowMouseDown(0));
        first.settle_all().await;
        assert_eq!(
            shared.get(),
            Resolution::Resolved(Coordinates::new(48.8566, 2.3522))
        );
        assert_eq!(second.location(), shared.get());

        second.handle(Event::Focus);
        type_text(&mut second, "Wellington");
        second.settle_all().await;
        second.handle(Event::KeyDown(Key::ArrowDown));
        second.handle(Event::KeyDown(Key::Enter));
        second.settle_all().await;
        assert_eq!(
            first.location(),
            Resolution::Resolved(Coordinates::new(-41.2866, 174.7756))
        );
        // The widgets' own state never held the shared value
        assert_eq!(first.state().location, Resolution::Unset);
    }

    #[tokio::test]
    async fn test_observers_see_commit_in_one_write() {
        let backend = MemoryBackend::with_sample_places();
        let mut widget =
            PlaceInput::new(WidgetOptions::default(), backend.clone(), backend).unwrap();
        widget.handle(Event::Focus);
        type_text(&mut widget, "10 Down");
        widget.settle_all().await;
        widget.handle(Event::KeyDown(Key::ArrowDown));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        widget
            .store()
            .observe(move |s: &WidgetState| sink.lock().unwrap().push(s.clone()));

        widget.handle(Event::KeyDown(Key::Enter));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let committed = &seen[0];
        assert_eq!(committed.input_text, "10 Downing Street, London, United Kingdom");
        assert_eq!(committed.active, None);
        assert!(!committed.interested);
        assert_eq!(
            committed.location,
            Resolution::Pending {
                previous: None,
                outstanding: 1
            }
        );
    }

    #[tokio::test]
    async fn test_shared_location_turns_pending_on_commit() {
        let (provider, widget) = gated();
        let shared: Store<Resolution> = Store::new(Resolution::Unset);
        let mut widget = widget.with_location(Arc::new(shared.clone()));

        widget.handle(Event::Focus);
        let suggestions = provider.gate_suggestions("Lon");
        type_text(&mut widget, "Lon");
        suggestions
            .send(Ok(vec![Suggestion::new("p2", "London")]))
            .unwrap();
        widget.settle_all().await;

        let _location = provider.gate_location("p2");
        widget.handle(Event::RowMouseDown(0));
        assert!(shared.get().is_pending());
        assert_eq!(widget.state().location, Resolution::Unset);
    }

    #[tokio::test]
    async fn test_pump_applies_finished_calls() {
        let (provider, mut widget) = gated();
        widget.handle(Event::Focus);
        let gate = provider.gate_suggestions("Ber");
        type_text(&mut widget, "Ber");

        assert_eq!(widget.pump(), 0);
        gate.send(Ok(vec![Suggestion::new("p4", "Berlin")])).unwrap();

        // Let the fetch task run and report back
        while widget.pump() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(widget.state().suggestions.len(), 1);
        assert_eq!(widget.in_flight(), 0);
    }
}
