//! Configuration constants for pkgfav app services

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "pkgfav";

    /// File holding the persisted key-value store
    pub const STORAGE_FILE: &str = "storage.json";

    /// Settings file name
    pub const SETTINGS_FILE: &str = "settings.json";

    /// Log file used while the terminal UI owns the screen
    pub const LOG_FILE: &str = "pkgfav.log";
}

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("pkgfav/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Read timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// Provider-related configuration
pub mod providers {
    /// Default npms.io API server
    pub const NPMS_DEFAULT_SERVER: &str = "https://api.npms.io";

    /// Search endpoint path
    pub const NPMS_SEARCH_PATH: &str = "/v2/search";
}

/// UI-related configuration
pub mod ui {
    /// Pause after confirming "add to favorites" before the selection clears,
    /// in milliseconds. Stands in for a remote sync call.
    pub const ADD_CONFIRM_DELAY_MS: u64 = 1000;

    /// Inline message shown when a registry search fails
    pub const FETCH_ERROR_TEXT: &str = "Error fetching data";

    /// Shown on the favorites screen when the list is empty
    pub const EMPTY_FAVORITES_TEXT: &str = "No favorites yet.";
}
