//! Error types for pkgfav app services
//!
//! Application-level errors that wrap store errors and add app-specific variants.

use pkgfav::error::StoreError;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Registry search failed or returned a non-success status
    #[error("{0}")]
    RemoteFetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this error came from the key-value store being unavailable
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_unavailable())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::RemoteFetch(friendly_network_error(&e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Store(StoreError::unavailable(e.to_string()))
    }
}

/// Result type alias for pkgfav app services
pub type Result<T> = std::result::Result<T, AppError>;

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {url}");
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("Could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    if e.is_status() {
        if let Some(status) = e.status() {
            return format!("Registry returned HTTP {}", status.as_u16());
        }
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    format!("Network error: {e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_passes_through() {
        let err: AppError = StoreError::unavailable("disk full").into();
        assert!(err.is_storage_unavailable());
        assert_eq!(err.to_string(), "Storage unavailable: disk full");
    }

    #[test]
    fn test_io_error_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(err.is_storage_unavailable());
    }

    #[test]
    fn test_remote_fetch_is_not_storage() {
        let err = AppError::RemoteFetch("Connection timed out".to_string());
        assert!(!err.is_storage_unavailable());
        assert_eq!(err.to_string(), "Connection timed out");
    }
}
