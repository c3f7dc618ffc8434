//! pkgfav: package favorites store
//!
//! Key-value persistence abstraction and the favorites store built on it.
//!
//! ## Quick start
//!
//! ```
//! use pkgfav::favorites::FavoritesStore;
//! use pkgfav::kv::MemoryStore;
//!
//! let mut store = FavoritesStore::new(MemoryStore::new());
//! store.add_favorite("lodash", Some("fast utils")).unwrap();
//! assert_eq!(store.list_favorites(), vec!["lodash".to_string()]);
//! ```

pub mod config;
pub mod error;
pub mod favorites;
pub mod kv;
pub mod types;

pub use error::{Result, StoreError};
pub use favorites::FavoritesStore;
pub use kv::{KeyValueStore, MemoryStore, WriteOp};
pub use types::{FavoriteEntry, FavoriteFilter, SearchResultItem};
