//! # Engine
//!
//! One explicitly constructed instance owns all mutable maze state: the
//! graph snapshot, the layout, navigation progress, the log and the viewport.
//!
//! ## Execution model
//!
//! Every state transition is synchronous. A command that needs the host
//! (`open`, `link`) returns a [`HostRequest`] from [`Engine::submit`] and
//! finishes in [`Engine::complete`]. While a request is in flight, further
//! lines are queued and run in submission order once it completes, so two
//! commands never interleave their mutations.
//!
//! Persistence is explicit: call [`Engine::save`] after a batch of
//! transitions.

use std::collections::VecDeque;

use vaultcrawl_core::DocumentGraph;
use vaultcrawl_procedural::{LayoutGenerator, MazeLayout};

use crate::autocomplete::LinkAutocomplete;
use crate::config::EngineConfig;
use crate::error::PersistError;
use crate::host::{HostOutcome, HostRequest};
use crate::log::GameLog;
use crate::navigation::NavigationState;
use crate::persistence::{decode_state, encode_state, PersistedState};
use crate::search::TokenIndex;
use crate::view::{AutocompleteView, SessionView};
use crate::viewport::{MapViewport, ViewBox};

/// The maze core.
#[derive(Debug)]
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) generator: LayoutGenerator,
    pub(crate) graph: DocumentGraph,
    pub(crate) tokens: TokenIndex,
    pub(crate) layout: Option<MazeLayout>,
    pub(crate) nav: NavigationState,
    pub(crate) log: GameLog,
    pub(crate) viewport: MapViewport,
    pub(crate) autocomplete: LinkAutocomplete,
    pub(crate) in_flight: Option<HostRequest>,
    queued: VecDeque<String>,
}

impl Engine {
    /// Creates an engine with no documents.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            generator: LayoutGenerator::new(config.layout.clone()),
            graph: DocumentGraph::new(),
            tokens: TokenIndex::default(),
            layout: None,
            nav: NavigationState::new(&config.navigation),
            log: GameLog::new(),
            viewport: MapViewport::new(config.viewport.clone()),
            autocomplete: LinkAutocomplete::new(),
            in_flight: None,
            queued: VecDeque::new(),
            config,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds the maze for `graph` and restores saved progress.
    ///
    /// The saved blob is optional and may be garbage: an unreadable blob is
    /// treated as no saved state, and a rejected layout is regenerated.
    /// Without a saved room the player starts in `open_document`, or the
    /// first document by id.
    pub fn load(&mut self, graph: DocumentGraph, open_document: Option<&str>, saved: Option<&str>) {
        let saved = saved.and_then(decode_state);
        let record = saved.as_ref().and_then(PersistedState::layout);

        self.graph = graph;
        self.tokens = TokenIndex::build(&self.graph);
        self.layout = self.generator.build_or_reuse(&self.graph, record.as_ref());
        self.nav.reset();
        self.autocomplete.clear();
        self.in_flight = None;
        self.queued.clear();

        let Some(layout) = &self.layout else {
            tracing::info!("Loaded an empty vault");
            self.log.system("The vault is empty. There is nothing to explore.");
            return;
        };

        if let Some(state) = &saved {
            self.nav.restore(
                layout,
                state.current_room_id.as_deref(),
                &state.discovered,
                &state.inventory,
                &state.travel_history,
            );
        }
        if self.nav.current_room().is_none() {
            if let Some(room) = NavigationState::choose_initial_room(&self.graph, open_document) {
                self.nav.move_to_room(layout, &room);
            }
        }

        self.viewport.fit(layout);
        if let Some(room) = self.nav.current_room() {
            self.viewport.center_on(layout, room);
        }
        tracing::info!(
            "Loaded {} documents into a {}x{} maze ({} discovered)",
            self.graph.len(),
            layout.width(),
            layout.height(),
            self.nav.discovered().len()
        );

        self.log.narrate("You descend into the vault.");
        self.describe_current();
    }

    /// Swaps in a new graph snapshot.
    ///
    /// The layout is reused while the document set is unchanged (link doors
    /// are recomputed) and reconciled otherwise. Progress on rooms that
    /// vanished is dropped.
    pub fn replace_graph(&mut self, graph: DocumentGraph) {
        let previous = self.layout.as_ref().map(MazeLayout::to_persisted);
        self.graph = graph;
        self.tokens = TokenIndex::build(&self.graph);
        self.layout = self.generator.build_or_reuse(&self.graph, previous.as_ref());
        self.autocomplete.clear();

        let Some(layout) = &self.layout else {
            self.nav.reset();
            self.log.system("Every document is gone. The vault is empty.");
            return;
        };

        let kept = self.nav.retain_known(layout);
        if self.nav.current_room().is_none() {
            if let Some(room) = NavigationState::choose_initial_room(&self.graph, None) {
                self.nav.move_to_room(layout, &room);
            }
            if !kept {
                self.log.narrate("The walls shift. You find yourself somewhere else.");
            }
        }
        if self.viewport.is_stale(layout) {
            self.viewport.fit(layout);
            if let Some(room) = self.nav.current_room() {
                self.viewport.center_on(layout, room);
            }
        }
        tracing::debug!("Graph replaced: {} documents, {} links", self.graph.len(), self.graph.edge_count());
    }

    // ========================================================================
    // Command queue
    // ========================================================================

    /// Runs a command line, or queues it behind the in-flight request.
    ///
    /// Returns the host round trip the command is waiting on, if any.
    pub fn submit(&mut self, line: &str) -> Option<HostRequest> {
        if self.in_flight.is_some() {
            self.queued.push_back(line.to_string());
            return None;
        }
        self.execute(line)
    }

    /// Finishes the in-flight command with the host's answer, then runs
    /// queued lines until one needs the host again.
    pub fn complete(&mut self, outcome: HostOutcome) -> Option<HostRequest> {
        let Some(request) = self.in_flight.take() else {
            tracing::warn!("Host outcome arrived with no request in flight");
            return None;
        };
        self.apply_outcome(request, outcome);

        while let Some(line) = self.queued.pop_front() {
            if let Some(request) = self.execute(&line) {
                return Some(request);
            }
        }
        None
    }

    /// Whether a command is waiting on the host.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Lines waiting behind the in-flight command.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    // ========================================================================
    // Input box
    // ========================================================================

    /// Updates the live input buffer, driving link autocomplete.
    pub fn set_input(&mut self, buffer: &str) {
        self.autocomplete.update(
            buffer,
            self.nav.current_room(),
            &self.graph,
            self.config.search.limit,
        );
    }

    /// Highlights the next suggestion.
    pub fn select_next_suggestion(&mut self) {
        self.autocomplete.select_next();
    }

    /// Highlights the previous suggestion.
    pub fn select_previous_suggestion(&mut self) {
        self.autocomplete.select_previous();
    }

    /// Recalls an older command line.
    pub fn history_previous(&mut self) -> Option<String> {
        self.nav.command_history_mut().older().map(str::to_string)
    }

    /// Recalls a newer command line; `None` past the newest.
    pub fn history_next(&mut self) -> Option<String> {
        self.nav.command_history_mut().newer().map(str::to_string)
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Fits the whole grid.
    pub fn fit_viewport(&mut self) -> Option<ViewBox> {
        let layout = self.layout.as_ref()?;
        Some(self.viewport.fit(layout))
    }

    /// Centers on the current room.
    pub fn center_viewport(&mut self) -> Option<ViewBox> {
        let layout = self.layout.as_ref()?;
        let room = self.nav.current_room()?;
        Some(self.viewport.center_on(layout, room))
    }

    /// Zooms by `factor`; `> 1` zooms in.
    pub fn zoom_viewport(&mut self, factor: f64) -> Option<ViewBox> {
        let layout = self.layout.as_ref()?;
        if self.viewport.is_stale(layout) {
            self.viewport.fit(layout);
        }
        Some(self.viewport.zoom(factor))
    }

    /// Pans by a drag delta.
    pub fn pan_viewport(&mut self, dx: f64, dy: f64) -> Option<ViewBox> {
        let layout = self.layout.as_ref()?;
        if self.viewport.is_stale(layout) {
            self.viewport.fit(layout);
        }
        Some(self.viewport.pan(dx, dy))
    }

    // ========================================================================
    // Persistence and snapshots
    // ========================================================================

    /// Progress plus the cached layout.
    ///
    /// # Errors
    ///
    /// Fails only if the layout cannot be represented as JSON.
    pub fn persisted_state(&self) -> Result<PersistedState, PersistError> {
        let mut state = PersistedState {
            current_room_id: self.nav.current_room().map(str::to_string),
            discovered: self.nav.discovered().iter().cloned().collect(),
            inventory: self.nav.inventory().iter().cloned().collect(),
            travel_history: self.nav.travel_history().iter().map(str::to_string).collect(),
            maze_layout: None,
        };
        let record = self.layout.as_ref().map(MazeLayout::to_persisted);
        state.set_layout(record.as_ref())?;
        Ok(state)
    }

    /// Encodes [`Engine::persisted_state`] for the host's store.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn save(&self) -> Result<String, PersistError> {
        encode_state(&self.persisted_state()?)
    }

    /// Copies out everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        let fresh = self
            .layout
            .as_ref()
            .filter(|layout| !self.viewport.is_stale(layout));
        SessionView {
            log: self.log.entries().to_vec(),
            current_room: self.nav.current_room().map(str::to_string),
            discovered: self.nav.discovered().iter().cloned().collect(),
            inventory: self.nav.inventory().iter().cloned().collect(),
            viewport: fresh.map(|_| self.viewport.view()),
            layout_signature: self.layout.as_ref().map(|l| l.signature().to_string()),
            grid: self.layout.as_ref().map(|l| (l.width(), l.height())),
            autocomplete: AutocompleteView {
                active: self.autocomplete.is_active(),
                query: self.autocomplete.query().to_string(),
                suggestions: self.autocomplete.suggestions().to_vec(),
                selected: self.autocomplete.selected_index(),
            },
            busy: self.is_busy(),
            pending_ai: self.nav.pending_ai(),
        }
    }

    /// Sets the external companion's busy flag.
    pub fn set_pending_ai(&mut self, pending: bool) {
        self.nav.set_pending_ai(pending);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current graph snapshot.
    #[must_use]
    pub fn graph(&self) -> &DocumentGraph {
        &self.graph
    }

    /// Current layout, `None` for an empty vault.
    #[must_use]
    pub fn layout(&self) -> Option<&MazeLayout> {
        self.layout.as_ref()
    }

    /// Navigation progress.
    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    /// Player-facing log.
    #[must_use]
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// Map viewport.
    #[must_use]
    pub fn viewport(&self) -> &MapViewport {
        &self.viewport
    }

    /// Link autocomplete state.
    #[must_use]
    pub fn autocomplete(&self) -> &LinkAutocomplete {
        &self.autocomplete
    }
}
