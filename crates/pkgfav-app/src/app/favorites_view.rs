//! Favorites screen state machine
//!
//! One explicit mode at a time: idle, confirming a removal, editing a
//! reason, or viewing a reason. Every mutating transition re-reads the
//! store so the rendered list always reflects what is persisted.

use pkgfav::favorites::FavoritesStore;
use pkgfav::kv::KeyValueStore;
use pkgfav::types::FavoriteEntry;

use super::state::Transition;

/// What the favorites screen is currently doing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FavoritesMode {
    #[default]
    Idle,
    ConfirmingRemoval {
        name: String,
    },
    Editing {
        name: String,
        draft: String,
    },
    ViewingReason {
        name: String,
    },
}

/// User input for the favorites screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesAction {
    /// Delete clicked on a row
    RequestRemoval(String),
    /// Removal confirmed
    ConfirmRemoval,
    /// Edit clicked on a row
    StartEdit(String),
    /// Draft text changed while editing
    UpdateDraft(String),
    /// Edited reason saved
    Save,
    /// View clicked on a row
    View(String),
    /// Reason dialog closed
    Close,
    /// Removal or edit abandoned
    Cancel,
}

/// Favorites screen: current mode plus a snapshot of the store
#[derive(Debug, Default)]
pub struct FavoritesView {
    mode: FavoritesMode,
    entries: Vec<FavoriteEntry>,
    selected: usize,
    error: Option<String>,
}

impl FavoritesView {
    /// Create an empty view (nothing read yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view populated from `store`
    pub fn load<S: KeyValueStore>(store: &FavoritesStore<S>) -> Self {
        let mut view = Self::new();
        view.refresh(store);
        view
    }

    /// Re-read the snapshot from `store`
    pub fn refresh<S: KeyValueStore>(&mut self, store: &FavoritesStore<S>) {
        self.entries = store.entries();
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    pub fn mode(&self) -> &FavoritesMode {
        &self.mode
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inline error from the last failed mutation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Acknowledge the inline error. Returns whether one was showing.
    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    // =========================================================================
    // Row cursor
    // =========================================================================

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&FavoriteEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Reason text for the package being viewed, empty if none is stored
    pub fn viewed_reason(&self) -> Option<&str> {
        match &self.mode {
            FavoritesMode::ViewingReason { name } => Some(
                self.entries
                    .iter()
                    .find(|e| &e.package_name == name)
                    .map_or("", FavoriteEntry::reason_or_empty),
            ),
            _ => None,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Feed one action through the state machine
    pub fn apply<S: KeyValueStore>(
        &mut self,
        store: &mut FavoritesStore<S>,
        action: FavoritesAction,
    ) -> Transition {
        let mode = std::mem::take(&mut self.mode);

        let (next, outcome) = match (mode, action) {
            (FavoritesMode::Idle, FavoritesAction::RequestRemoval(name)) => {
                (FavoritesMode::ConfirmingRemoval { name }, Ok(false))
            }
            (FavoritesMode::ConfirmingRemoval { name }, FavoritesAction::ConfirmRemoval) => {
                let result = store.remove_favorite(&name).map(|_| true);
                (FavoritesMode::Idle, result)
            }
            (FavoritesMode::ConfirmingRemoval { .. }, FavoritesAction::Cancel) => {
                (FavoritesMode::Idle, Ok(false))
            }
            (FavoritesMode::Idle, FavoritesAction::StartEdit(name)) => {
                let draft = store.get_reason(&name).unwrap_or_default();
                (FavoritesMode::Editing { name, draft }, Ok(false))
            }
            (FavoritesMode::Editing { name, .. }, FavoritesAction::UpdateDraft(draft)) => {
                (FavoritesMode::Editing { name, draft }, Ok(false))
            }
            (FavoritesMode::Editing { name, draft }, FavoritesAction::Save) => {
                let result = store.set_reason(&name, &draft).map(|()| true);
                (FavoritesMode::Idle, result)
            }
            (FavoritesMode::Editing { .. }, FavoritesAction::Cancel) => {
                (FavoritesMode::Idle, Ok(false))
            }
            (FavoritesMode::Idle, FavoritesAction::View(name)) => {
                (FavoritesMode::ViewingReason { name }, Ok(false))
            }
            (FavoritesMode::ViewingReason { .. }, FavoritesAction::Close) => {
                (FavoritesMode::Idle, Ok(false))
            }
            (mode, action) => {
                tracing::debug!("Ignoring {action:?} while {mode:?}");
                self.mode = mode;
                return Transition::Ignored;
            }
        };

        self.mode = next;
        match outcome {
            Ok(false) => {
                self.error = None;
                Transition::Applied
            }
            Ok(true) => {
                self.error = None;
                self.refresh(store);
                Transition::Mutated
            }
            Err(e) => {
                tracing::warn!("Favorites update failed: {e}");
                self.error = Some(e.to_string());
                self.refresh(store);
                Transition::Failed
            }
        }
    }
}
