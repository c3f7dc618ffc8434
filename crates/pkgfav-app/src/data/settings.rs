//! Application settings management
//!
//! User preferences persisted next to the key-value store.

use crate::config::app::SETTINGS_FILE;
use crate::config::providers::NPMS_DEFAULT_SERVER;
use crate::config::ui::ADD_CONFIRM_DELAY_MS;
use crate::data::storage;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file format version for migrations
const SETTINGS_VERSION: u32 = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,

    // === Search ===
    /// Base URL of the package-search service
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    // === Favorites ===
    /// Pause after confirming an add before the selection clears (ms)
    #[serde(default = "default_add_delay_ms")]
    pub add_delay_ms: u64,

    /// Key-value store location; the config directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_registry_url() -> String {
    NPMS_DEFAULT_SERVER.to_string()
}

fn default_add_delay_ms() -> u64 {
    ADD_CONFIRM_DELAY_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            registry_url: default_registry_url(),
            add_delay_ms: default_add_delay_ms(),
            store_path: None,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from default storage location
    pub fn load() -> Result<Self> {
        let path = storage::data_path(SETTINGS_FILE)?;
        Self::load_from(&path)
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        match storage::load_from::<Settings>(path)? {
            Some(settings) => Ok(settings),
            None => Ok(Self::default()),
        }
    }

    /// Save settings to default storage location
    pub fn save(&self) -> Result<()> {
        let path = storage::data_path(SETTINGS_FILE)?;
        self.save_to(&path)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        storage::save_to(path, self)
    }

    /// Add-confirmation delay as a `Duration`
    pub fn add_delay(&self) -> Duration {
        Duration::from_millis(self.add_delay_ms)
    }

    /// Registry URL without a trailing slash
    pub fn registry_base(&self) -> &str {
        self.registry_url.trim_end_matches('/')
    }
}
