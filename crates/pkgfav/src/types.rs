//! Common data types
//!
//! Shared types used across the favorites store and its consumers.

use serde::{Deserialize, Serialize};

// =============================================================================
// FavoriteEntry - A favorited package with its optional reason
// =============================================================================

/// A favorited package and the reason the user gave for keeping it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Package name (unique key)
    pub package_name: String,
    /// Free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FavoriteEntry {
    /// Create an entry without a reason
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            reason: None,
        }
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Reason text, or an empty string when none was stored
    pub fn reason_or_empty(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }
}

// =============================================================================
// SearchResultItem - One row of a registry search
// =============================================================================

/// A package returned by a registry search. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl SearchResultItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Filter criteria for favorites
#[derive(Debug, Default, Clone)]
pub struct FavoriteFilter {
    /// Case-insensitive substring of the package name
    pub search: Option<String>,
    /// Case-insensitive substring of the reason
    pub reason: Option<String>,
    /// Only entries that have (or lack) a stored reason
    pub has_reason: Option<bool>,
}

impl FavoriteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn has_reason(mut self, has_reason: bool) -> Self {
        self.has_reason = Some(has_reason);
        self
    }

    /// Check if an entry matches this filter
    pub fn matches(&self, entry: &FavoriteEntry) -> bool {
        if let Some(ref search) = self.search {
            let search_lower = search.to_lowercase();
            if !entry.package_name.to_lowercase().contains(&search_lower) {
                return false;
            }
        }

        if let Some(ref reason) = self.reason {
            let reason_lower = reason.to_lowercase();
            match entry.reason {
                Some(ref r) if r.to_lowercase().contains(&reason_lower) => {}
                _ => return false,
            }
        }

        if let Some(has_reason) = self.has_reason {
            if entry.reason.is_some() != has_reason {
                return false;
            }
        }

        true
    }
}
