//! Data persistence
//!
//! File-backed key-value store, settings, and JSON file helpers.

pub mod file_store;
pub mod settings;
pub mod storage;

// Re-export common types
pub use file_store::FileStore;
pub use settings::Settings;
pub use storage::{config_dir, data_path, ensure_config_dir};
