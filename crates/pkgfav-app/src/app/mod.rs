//! Screen state
//!
//! Routing, the search and favorites screen state machines, and the
//! background search controller. Frontends (the terminal UI, one-shot CLI
//! commands) drive these and render their snapshots.

pub mod controller;
pub mod favorites_view;
pub mod search_view;
pub mod state;

pub use controller::{SearchController, SearchEvent};
pub use favorites_view::{FavoritesAction, FavoritesMode, FavoritesView};
pub use search_view::{AddFlow, SearchRequest, SearchStatus, SearchView};
pub use state::{AppState, Route, Transition};
