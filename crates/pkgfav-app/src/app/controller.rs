//! Background search controller
//!
//! Runs each search on its own worker thread and hands the outcome back to
//! the UI thread through a crossbeam channel. Nothing here knows which
//! query is current; [`SearchView::complete`](super::SearchView::complete)
//! drops outcomes whose generation is stale.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::providers::{PackageProvider, SearchResults};

use super::search_view::SearchRequest;

/// Outcome of one search, tagged with the request's generation
#[derive(Debug, Clone)]
pub struct SearchEvent {
    pub generation: u64,
    pub result: Result<SearchResults, String>,
}

pub struct SearchController {
    provider: Arc<dyn PackageProvider>,
    event_tx: Sender<SearchEvent>,
    event_rx: Receiver<SearchEvent>,
}

impl SearchController {
    pub fn new(provider: Arc<dyn PackageProvider>) -> Self {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        Self {
            provider,
            event_tx,
            event_rx,
        }
    }

    pub fn provider(&self) -> &dyn PackageProvider {
        self.provider.as_ref()
    }

    /// Start `request` on a worker thread
    pub fn dispatch(&self, request: &SearchRequest) {
        let SearchRequest { generation, term } = request.clone();
        let provider = Arc::clone(&self.provider);
        let tx = self.event_tx.clone();

        tracing::debug!("Dispatching search {term:?} to {} (generation {generation})", provider.id());

        let spawned = std::thread::Builder::new()
            .name("package-search".into())
            .spawn(move || {
                let result = provider.search(&term).map_err(|e| e.to_string());
                let _ = tx.send(SearchEvent { generation, result });
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn search thread: {e}");
            let _ = self.event_tx.send(SearchEvent {
                generation,
                result: Err(format!("Failed to start search: {e}")),
            });
        }
    }

    /// Next finished search, if any
    pub fn try_recv(&self) -> Option<SearchEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Every finished search, oldest first
    pub fn drain(&self) -> Vec<SearchEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next finished search
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SearchEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            // Unreachable while we hold a sender
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
