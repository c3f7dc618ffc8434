//! File-backed key-value store
//!
//! Keeps the whole store as one JSON object on disk. Every mutation re-reads
//! the file, applies its writes to that copy, writes it out with an atomic
//! rename, and only then makes it visible. A failed write leaves both the
//! file and the in-memory view untouched, and keys written by another
//! process since `open` survive (last write wins per key).

use crate::config::app::STORAGE_FILE;
use crate::data::storage;
use crate::error::{AppError, Result};
use pkgfav::error::StoreError;
use pkgfav::kv::{apply_to_map, KeyValueStore, WriteOp};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key-value store persisted to a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store in the default config directory
    pub fn open_default() -> Result<Self> {
        let path = storage::data_path(STORAGE_FILE)?;
        Self::open(path)
    }

    /// Open the store at `path`
    ///
    /// A missing or empty file opens as an empty store. A file that cannot
    /// be read or does not hold a JSON object of strings is reported as
    /// storage unavailable.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = Self::read(&path)?;
        tracing::debug!("Opened key-value store {:?} ({} keys)", path, entries.len());
        Ok(Self { path, entries })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, discarding the in-memory view
    pub fn reload(&mut self) -> Result<()> {
        self.entries = Self::read(&self.path)?;
        Ok(())
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        match storage::load_from::<BTreeMap<String, String>>(path) {
            Ok(entries) => Ok(entries.unwrap_or_default()),
            Err(AppError::Config(msg)) => Err(StoreError::unavailable(msg).into()),
            Err(e) => Err(e),
        }
    }

    /// Current on-disk contents, as the base for a mutation
    fn stage(&self) -> pkgfav::Result<BTreeMap<String, String>> {
        Self::read(&self.path).map_err(into_store_error)
    }

    /// Write `staged` to disk, then adopt it
    fn commit(&mut self, staged: BTreeMap<String, String>) -> pkgfav::Result<()> {
        storage::save_to(&self.path, &staged).map_err(into_store_error)?;
        self.entries = staged;
        Ok(())
    }
}

fn into_store_error(e: AppError) -> StoreError {
    match e {
        AppError::Store(inner) => inner,
        other => StoreError::unavailable(other.to_string()),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> pkgfav::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> pkgfav::Result<()> {
        let mut staged = self.stage()?;
        staged.insert(key.to_string(), value.to_string());
        self.commit(staged)
    }

    fn remove(&mut self, key: &str) -> pkgfav::Result<()> {
        let mut staged = self.stage()?;
        if staged.remove(key).is_none() {
            self.entries = staged;
            return Ok(());
        }
        self.commit(staged)
    }

    fn keys(&self) -> pkgfav::Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn apply(&mut self, batch: &[WriteOp]) -> pkgfav::Result<()> {
        let mut staged = self.stage()?;
        apply_to_map(&mut staged, batch);
        self.commit(staged)
    }
}
