//! Favorites store
//!
//! Domain operations over a [`KeyValueStore`]. The store is the only writer
//! of the `favorites` list and the `favoriteReason_<name>` keys, and every
//! mutation that touches both goes through a single [`KeyValueStore::apply`]
//! batch.

use crate::config::{keys, package_from_reason_key, reason_key};
use crate::error::{Result, StoreError};
use crate::kv::{KeyValueStore, WriteOp};
use crate::types::{FavoriteEntry, FavoriteFilter};
use std::collections::HashSet;

/// Favorites list plus per-package reasons, backed by an injected adapter
pub struct FavoritesStore<S: KeyValueStore> {
    adapter: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Wrap a persistence adapter
    pub fn new(adapter: S) -> Self {
        Self { adapter }
    }

    /// Borrow the underlying adapter
    pub fn adapter(&self) -> &S {
        &self.adapter
    }

    /// Mutably borrow the underlying adapter
    pub fn adapter_mut(&mut self) -> &mut S {
        &mut self.adapter
    }

    /// Consume the store, returning the adapter
    pub fn into_inner(self) -> S {
        self.adapter
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Favorite package names in insertion order
    ///
    /// An absent, malformed, or unreadable list reads as empty.
    pub fn list_favorites(&self) -> Vec<String> {
        match self.read_list() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Treating favorites list as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Whether `package_name` is currently listed
    pub fn is_favorite(&self, package_name: &str) -> bool {
        self.list_favorites().iter().any(|n| n == package_name)
    }

    /// Stored reason for `package_name`, if any
    ///
    /// Works for any name, favorited or not. Malformed values read as absent.
    pub fn get_reason(&self, package_name: &str) -> Option<String> {
        let key = reason_key(package_name);
        match self.read_json::<String>(&key) {
            Ok(reason) => reason,
            Err(e) => {
                tracing::warn!("Ignoring reason for '{package_name}': {e}");
                None
            }
        }
    }

    /// All favorites joined with their reasons, in list order
    pub fn entries(&self) -> Vec<FavoriteEntry> {
        self.list_favorites()
            .into_iter()
            .map(|name| {
                let reason = self.get_reason(&name);
                FavoriteEntry {
                    package_name: name,
                    reason,
                }
            })
            .collect()
    }

    /// Entries matching `filter`, in list order
    pub fn filtered(&self, filter: &FavoriteFilter) -> Vec<FavoriteEntry> {
        self.entries()
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect()
    }

    /// Number of favorites
    pub fn count(&self) -> usize {
        self.list_favorites().len()
    }

    /// Check if there are no favorites
    pub fn is_empty(&self) -> bool {
        self.list_favorites().is_empty()
    }

    /// Package names that have a stored reason but are not listed
    pub fn orphaned_reasons(&self) -> Vec<String> {
        let keys = match self.adapter.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Cannot enumerate stored keys: {e}");
                return Vec::new();
            }
        };
        let listed: HashSet<String> = self.list_favorites().into_iter().collect();

        keys.iter()
            .filter_map(|k| package_from_reason_key(k))
            .filter(|name| !listed.contains(*name))
            .map(str::to_string)
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `package_name` with an optional reason
    ///
    /// Returns `Ok(false)` without touching storage if the name is already a
    /// favorite; the existing reason is kept. Otherwise the list append and
    /// the reason write are applied as one batch.
    pub fn add_favorite(&mut self, package_name: &str, reason: Option<&str>) -> Result<bool> {
        let mut names = self.list_for_write()?;
        if names.iter().any(|n| n == package_name) {
            tracing::debug!("'{package_name}' is already a favorite");
            return Ok(false);
        }
        names.push(package_name.to_string());

        let reason_op = match reason {
            Some(reason) => WriteOp::set(reason_key(package_name), serde_json::to_string(reason)?),
            // Drop any orphan left behind by an earlier set_reason
            None => WriteOp::remove(reason_key(package_name)),
        };

        self.adapter.apply(&[
            WriteOp::set(keys::FAVORITES, serde_json::to_string(&names)?),
            reason_op,
        ])?;
        tracing::debug!("Added '{package_name}' to favorites");
        Ok(true)
    }

    /// Remove `package_name` and its reason
    ///
    /// The reason key is removed even if the name was not listed. Returns
    /// whether the name was listed.
    pub fn remove_favorite(&mut self, package_name: &str) -> Result<bool> {
        let mut names = self.list_for_write()?;
        let before = names.len();
        names.retain(|n| n != package_name);
        let was_listed = names.len() != before;

        let mut batch = Vec::with_capacity(2);
        if was_listed {
            batch.push(WriteOp::set(keys::FAVORITES, serde_json::to_string(&names)?));
        }
        batch.push(WriteOp::remove(reason_key(package_name)));

        self.adapter.apply(&batch)?;
        tracing::debug!("Removed '{package_name}' from favorites (listed: {was_listed})");
        Ok(was_listed)
    }

    /// Overwrite the reason for `package_name`
    ///
    /// Does not require `package_name` to be a favorite.
    pub fn set_reason(&mut self, package_name: &str, reason: &str) -> Result<()> {
        let value = serde_json::to_string(reason)?;
        self.adapter.set(&reason_key(package_name), &value)
    }

    /// Delete reasons whose package is no longer listed. Returns how many.
    pub fn prune_orphaned_reasons(&mut self) -> Result<usize> {
        let orphans = self.orphaned_reasons();
        if orphans.is_empty() {
            return Ok(0);
        }
        let batch: Vec<WriteOp> = orphans
            .iter()
            .map(|name| WriteOp::remove(reason_key(name)))
            .collect();
        self.adapter.apply(&batch)?;
        Ok(orphans.len())
    }

    /// Remove every favorite and every reason
    pub fn clear(&mut self) -> Result<()> {
        let mut batch = vec![WriteOp::remove(keys::FAVORITES)];
        batch.extend(
            self.adapter
                .keys()?
                .into_iter()
                .filter(|k| package_from_reason_key(k).is_some())
                .map(WriteOp::remove),
        );
        self.adapter.apply(&batch)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn read_list(&self) -> Result<Vec<String>> {
        Ok(self.read_json::<Vec<String>>(keys::FAVORITES)?.unwrap_or_default())
    }

    /// List to base a mutation on: malformed reads as empty, but an
    /// unreadable store fails the mutation instead of overwriting the list.
    fn list_for_write(&self) -> Result<Vec<String>> {
        match self.read_list() {
            Ok(names) => Ok(names),
            Err(StoreError::Malformed { key, message }) => {
                tracing::warn!("Replacing malformed '{key}': {message}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = match self.adapter.get(key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}
