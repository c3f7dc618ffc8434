//! Shared application state and routing
//!
//! `Route` names the two screens. `AppState` bundles the favorites store
//! with both screen state machines so a frontend can own a single value.

use pkgfav::favorites::FavoritesStore;
use pkgfav::kv::KeyValueStore;
use std::time::Duration;

use super::favorites_view::FavoritesView;
use super::search_view::SearchView;

/// Outcome of feeding an action to a screen state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed, storage untouched
    Applied,
    /// State changed and storage was written
    Mutated,
    /// The action is not valid in the current state; nothing changed
    Ignored,
    /// A storage write failed; the error is shown inline by the screen
    Failed,
}

impl Transition {
    /// Whether the action took effect
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied | Transition::Mutated)
    }
}

/// The two navigable screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Search,
    Favorites,
}

impl Route {
    /// Resolve a path. Unknown paths fall back to the search screen.
    pub fn from_path(path: &str) -> Self {
        if path == "/favorites" || path.starts_with("/favorites/") {
            Route::Favorites
        } else {
            Route::Search
        }
    }

    /// Canonical path of this screen
    pub fn path(self) -> &'static str {
        match self {
            Route::Search => "/",
            Route::Favorites => "/favorites",
        }
    }

    /// Screen heading
    pub fn title(self) -> &'static str {
        match self {
            Route::Search => "Search for NPM Packages",
            Route::Favorites => "Your Favorites",
        }
    }

    /// The other screen
    pub fn toggled(self) -> Self {
        match self {
            Route::Search => Route::Favorites,
            Route::Favorites => Route::Search,
        }
    }
}

/// Store plus both screens, owned by one frontend thread
pub struct AppState<S: KeyValueStore> {
    pub store: FavoritesStore<S>,
    pub route: Route,
    pub search: SearchView,
    pub favorites: FavoritesView,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(store: FavoritesStore<S>, add_delay: Duration) -> Self {
        let favorites = FavoritesView::load(&store);
        Self {
            store,
            route: Route::default(),
            search: SearchView::new(add_delay),
            favorites,
        }
    }

    /// Switch screens. Entering the favorites screen re-reads the store.
    pub fn navigate(&mut self, route: Route) {
        if route == Route::Favorites {
            self.favorites.refresh(&self.store);
        }
        tracing::debug!("Navigating to {}", route.path());
        self.route = route;
    }

    /// Switch screens by path
    pub fn navigate_path(&mut self, path: &str) {
        self.navigate(Route::from_path(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgfav::kv::MemoryStore;

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Route::Search);
        assert_eq!(Route::from_path("/favorites"), Route::Favorites);
        assert_eq!(Route::from_path("/favorites/react"), Route::Favorites);
    }

    #[test]
    fn test_unknown_path_redirects_to_search() {
        assert_eq!(Route::from_path("/nope"), Route::Search);
        assert_eq!(Route::from_path(""), Route::Search);
        assert_eq!(Route::from_path("/favoritesx"), Route::Search);
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in [Route::Search, Route::Favorites] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::Search.toggled(), Route::Favorites);
    }

    #[test]
    fn test_navigate_refreshes_favorites() {
        let mut state = AppState::new(FavoritesStore::new(MemoryStore::new()), Duration::ZERO);
        assert!(state.favorites.is_empty());

        state.store.add_favorite("lodash", Some("fast utils")).unwrap();
        // Not re-read until the screen is entered
        assert!(state.favorites.is_empty());

        state.navigate_path("/favorites");
        assert_eq!(state.route, Route::Favorites);
        assert_eq!(state.favorites.entries().len(), 1);
    }

    #[test]
    fn test_transition_is_applied() {
        assert!(Transition::Applied.is_applied());
        assert!(Transition::Mutated.is_applied());
        assert!(!Transition::Ignored.is_applied());
        assert!(!Transition::Failed.is_applied());
    }
}
