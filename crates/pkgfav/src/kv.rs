//! Key-value persistence adapter
//!
//! The favorites store never touches a storage medium directly; it talks to
//! a [`KeyValueStore`] handed to it at construction. [`MemoryStore`] is the
//! in-process implementation (and the test fake); the application crate
//! provides a file-backed one.

use crate::error::{Result, StoreError};
use std::collections::BTreeMap;

// =============================================================================
// WriteOp - One mutation inside a batch
// =============================================================================

/// A single mutation applied through [`KeyValueStore::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl WriteOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        WriteOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        WriteOp::Remove { key: key.into() }
    }

    /// Key touched by this operation
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. } | WriteOp::Remove { key } => key,
        }
    }
}

/// Apply a batch to an ordered map in memory
///
/// Shared by adapters that stage a batch before committing it.
pub fn apply_to_map(map: &mut BTreeMap<String, String>, batch: &[WriteOp]) {
    for op in batch {
        match op {
            WriteOp::Set { key, value } => {
                map.insert(key.clone(), value.clone());
            }
            WriteOp::Remove { key } => {
                map.remove(key);
            }
        }
    }
}

// =============================================================================
// KeyValueStore - The adapter contract
// =============================================================================

/// Synchronous string-keyed storage
///
/// A missing key is not an error: `get` returns `Ok(None)` and `remove`
/// succeeds. A full or disabled store fails with
/// [`StoreError::StorageUnavailable`] and leaves its contents unchanged.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present
    fn remove(&mut self, key: &str) -> Result<()>;

    /// All stored keys
    fn keys(&self) -> Result<Vec<String>>;

    /// Apply a batch of mutations
    ///
    /// The default applies operations one at a time, so a failure part-way
    /// leaves the earlier operations applied. Implementations that can stage
    /// writes override this to make the batch all-or-nothing.
    fn apply(&mut self, batch: &[WriteOp]) -> Result<()> {
        for op in batch {
            match op {
                WriteOp::Set { key, value } => self.set(key, value)?,
                WriteOp::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn apply(&mut self, batch: &[WriteOp]) -> Result<()> {
        (**self).apply(batch)
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory key-value store
///
/// Supports an optional byte quota (sum of key and value lengths) and can be
/// switched off entirely, which is how tests reproduce a full or disabled
/// store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    available: bool,
}

impl MemoryStore {
    /// Create an empty, unbounded store
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: None,
            available: true,
        }
    }

    /// Create an empty store that refuses writes beyond `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Enable or disable the store. A disabled store fails every operation.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Bytes currently used (keys plus values)
    pub fn used_bytes(&self) -> usize {
        Self::size_of(&self.entries)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn size_of(map: &BTreeMap<String, String>) -> usize {
        map.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::unavailable("store is disabled"))
        }
    }

    fn check_quota(&self, size: usize) -> Result<()> {
        match self.quota {
            Some(quota) if size > quota => Err(StoreError::unavailable(format!(
                "quota of {} bytes exceeded ({} bytes requested)",
                quota, size
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let previous = self.entries.get(key).map_or(0, |v| key.len() + v.len());
        self.check_quota(self.used_bytes() - previous + key.len() + value.len())?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.check_available()?;
        Ok(self.entries.keys().cloned().collect())
    }

    fn apply(&mut self, batch: &[WriteOp]) -> Result<()> {
        self.check_available()?;
        let mut staged = self.entries.clone();
        apply_to_map(&mut staged, batch);
        self.check_quota(Self::size_of(&staged))?;
        self.entries = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Removing again is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_keys_sorted() {
        let mut store = MemoryStore::new();
        store.set("b", "").unwrap();
        store.set("a", "").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_disabled_store_fails_everything() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set_available(false);

        assert!(store.get("a").unwrap_err().is_unavailable());
        assert!(store.set("b", "2").unwrap_err().is_unavailable());
        assert!(store.remove("a").unwrap_err().is_unavailable());
        assert!(store.keys().unwrap_err().is_unavailable());

        store.set_available(true);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let mut store = MemoryStore::with_quota(10);
        store.set("key", "val").unwrap(); // 6 bytes
        let err = store.set("other", "value").unwrap_err(); // +10 bytes
        assert!(err.is_unavailable());
        assert_eq!(store.get("other").unwrap(), None);
        assert_eq!(store.used_bytes(), 6);
    }

    #[test]
    fn test_quota_counts_replacement_not_addition() {
        let mut store = MemoryStore::with_quota(8);
        store.set("key", "12345").unwrap(); // 8 bytes
        store.set("key", "54321").unwrap(); // still 8 bytes
        assert_eq!(store.used_bytes(), 8);
    }

    #[test]
    fn test_apply_batch_in_order() {
        let mut store = MemoryStore::new();
        store
            .apply(&[
                WriteOp::set("a", "1"),
                WriteOp::set("b", "2"),
                WriteOp::remove("a"),
            ])
            .unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_apply_batch_is_all_or_nothing() {
        let mut store = MemoryStore::with_quota(12);
        store.set("a", "1").unwrap();

        let result = store.apply(&[
            WriteOp::remove("a"),
            WriteOp::set("b", "2"),
            WriteOp::set("long-key", "long-value"),
        ]);

        assert!(result.unwrap_err().is_unavailable());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.apply(&[WriteOp::set("x", "y")]).unwrap();
        assert_eq!(store.get("x").unwrap().as_deref(), Some("y"));
        assert_eq!(store.keys().unwrap(), vec!["x".to_string()]);
    }

    #[test]
    fn test_write_op_key() {
        assert_eq!(WriteOp::set("k", "v").key(), "k");
        assert_eq!(WriteOp::remove("r").key(), "r");
    }
}
