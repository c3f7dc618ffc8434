//! Error types for pkgfav
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for the favorites store and its persistence adapters
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key-value store is full, disabled, or otherwise inaccessible.
    /// The mutation that hit this did not apply.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored value is not in its serialized form.
    ///
    /// Read operations on the favorites store degrade this to "absent".
    #[error("Malformed value under '{key}': {message}")]
    Malformed { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Convenience constructor for [`StoreError::StorageUnavailable`]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StoreError::StorageUnavailable(msg.into())
    }

    /// Whether this is a storage availability failure
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable(_))
    }
}

/// Result type alias for pkgfav
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        let err = StoreError::unavailable("quota exceeded");
        assert!(err.is_unavailable());
        assert_eq!(err.to_string(), "Storage unavailable: quota exceeded");
    }

    #[test]
    fn test_malformed_mentions_key() {
        let err = StoreError::Malformed {
            key: "favorites".to_string(),
            message: "expected a sequence".to_string(),
        };
        assert!(!err.is_unavailable());
        assert!(err.to_string().contains("favorites"));
    }
}
