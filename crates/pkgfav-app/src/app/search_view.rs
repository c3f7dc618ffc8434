//! Search screen state machine
//!
//! Holds the current term, the status of the latest query, and the
//! "add to favorites with reason" flow. Queries themselves run elsewhere
//! (see [`super::controller`]); each carries a generation number and only
//! the newest one is allowed to land.

use std::time::{Duration, Instant};

use pkgfav::favorites::FavoritesStore;
use pkgfav::kv::KeyValueStore;
use pkgfav::types::SearchResultItem;

use crate::config::ui::FETCH_ERROR_TEXT;
use crate::providers::SearchResults;

use super::state::Transition;

/// A query to run against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub term: String,
}

/// Status of the latest query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No term entered
    #[default]
    Idle,
    Loading,
    Loaded(Vec<SearchResultItem>),
    /// Query failed; holds the inline message
    Failed(String),
}

/// Progress of adding a search result to favorites
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AddFlow {
    #[default]
    Closed,
    /// Asking why the package is a favorite
    CapturingReason { name: String, reason: String },
    /// Saved; the dialog stays up until `until`
    Adding { name: String, until: Instant },
}

/// Search screen state
#[derive(Debug)]
pub struct SearchView {
    term: String,
    generation: u64,
    status: SearchStatus,
    add_flow: AddFlow,
    add_delay: Duration,
    selected: usize,
    error: Option<String>,
}

impl SearchView {
    /// Create a view whose add confirmation lingers for `add_delay`
    pub fn new(add_delay: Duration) -> Self {
        Self {
            term: String::new(),
            generation: 0,
            status: SearchStatus::Idle,
            add_flow: AddFlow::Closed,
            add_delay,
            selected: 0,
            error: None,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn add_flow(&self) -> &AddFlow {
        &self.add_flow
    }

    /// Generation of the newest query
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Inline error from the last failed add; cleared by the next term
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Acknowledge the inline error. Returns whether one was showing.
    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    /// Results of the current query; empty unless loaded
    pub fn results(&self) -> &[SearchResultItem] {
        match &self.status {
            SearchStatus::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn is_adding(&self) -> bool {
        matches!(self.add_flow, AddFlow::Adding { .. })
    }

    // =========================================================================
    // Querying
    // =========================================================================

    /// Replace the search term
    ///
    /// Any non-empty term, taken literally, produces a request and makes
    /// every earlier in-flight query stale. An empty term clears the results
    /// and issues nothing.
    pub fn set_term(&mut self, term: impl Into<String>) -> Option<SearchRequest> {
        self.term = term.into();
        self.generation += 1;
        self.selected = 0;
        self.error = None;

        if self.term.is_empty() {
            self.status = SearchStatus::Idle;
            return None;
        }

        self.status = SearchStatus::Loading;
        Some(SearchRequest {
            generation: self.generation,
            term: self.term.clone(),
        })
    }

    /// Deliver the outcome of a query
    ///
    /// Returns `false` (and changes nothing) when `generation` is not the
    /// newest one.
    pub fn complete(&mut self, generation: u64, result: Result<SearchResults, String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale search result (generation {generation}, current {})",
                self.generation
            );
            return false;
        }

        self.status = match result {
            Ok(results) => SearchStatus::Loaded(results.items),
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {e}", self.term);
                SearchStatus::Failed(FETCH_ERROR_TEXT.to_string())
            }
        };
        true
    }

    // =========================================================================
    // Result cursor
    // =========================================================================

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_result(&self) -> Option<&SearchResultItem> {
        self.results().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // =========================================================================
    // Add-to-favorites flow
    // =========================================================================

    /// Start adding `name`; opens the reason prompt
    ///
    /// Ignored when `name` is already a favorite or another add is in
    /// progress.
    pub fn select<S: KeyValueStore>(&mut self, name: &str, store: &FavoritesStore<S>) -> Transition {
        if self.add_flow != AddFlow::Closed {
            return Transition::Ignored;
        }
        if store.is_favorite(name) {
            tracing::debug!("'{name}' is already a favorite");
            return Transition::Ignored;
        }
        self.add_flow = AddFlow::CapturingReason {
            name: name.to_string(),
            reason: String::new(),
        };
        self.error = None;
        Transition::Applied
    }

    /// Replace the reason being typed
    pub fn update_reason(&mut self, text: impl Into<String>) -> Transition {
        match &mut self.add_flow {
            AddFlow::CapturingReason { reason, .. } => {
                *reason = text.into();
                Transition::Applied
            }
            _ => Transition::Ignored,
        }
    }

    /// Abandon the reason prompt
    pub fn cancel_selection(&mut self) -> Transition {
        match self.add_flow {
            AddFlow::CapturingReason { .. } => {
                self.add_flow = AddFlow::Closed;
                Transition::Applied
            }
            _ => Transition::Ignored,
        }
    }

    /// Save the pending favorite
    ///
    /// On success the prompt stays open in the adding state until
    /// [`tick`](Self::tick) sees the delay elapse. On a storage failure the
    /// prompt closes at once and the error is kept for display.
    pub fn confirm_add<S: KeyValueStore>(
        &mut self,
        store: &mut FavoritesStore<S>,
        now: Instant,
    ) -> Transition {
        let (name, reason) = match std::mem::take(&mut self.add_flow) {
            AddFlow::CapturingReason { name, reason } => (name, reason),
            other => {
                self.add_flow = other;
                return Transition::Ignored;
            }
        };

        match store.add_favorite(&name, Some(&reason)) {
            Ok(_) => {
                self.error = None;
                self.add_flow = AddFlow::Adding {
                    name,
                    until: now + self.add_delay,
                };
                Transition::Mutated
            }
            Err(e) => {
                tracing::warn!("Could not add '{name}' to favorites: {e}");
                self.error = Some(e.to_string());
                Transition::Failed
            }
        }
    }

    /// Advance time; closes the add dialog once its delay has elapsed
    ///
    /// Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.add_flow {
            AddFlow::Adding { until, .. } if now >= until => {
                self.add_flow = AddFlow::Closed;
                true
            }
            _ => false,
        }
    }
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::ui::ADD_CONFIRM_DELAY_MS))
    }
}
