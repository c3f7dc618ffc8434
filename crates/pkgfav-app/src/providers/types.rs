//! Shared provider types

use pkgfav::types::SearchResultItem;

/// Results from a package search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Matching packages, in response order
    pub items: Vec<SearchResultItem>,
    /// Total number of matches (if the provider reports it)
    pub total: Option<usize>,
}

impl SearchResults {
    /// Create an empty result set
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Some(0),
        }
    }

    /// Number of items in this response
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
