//! Package provider trait
//!
//! Defines the interface a package-search backend must implement.

use crate::error::Result;

use super::types::SearchResults;

/// A source of package listings
///
/// Implementations query one registry search service. Results come back in
/// the order the service returned them.
pub trait PackageProvider: Send + Sync {
    /// Display name for the provider (e.g., "npms.io")
    fn name(&self) -> &'static str;

    /// Machine-readable identifier (e.g., "npms")
    fn id(&self) -> &'static str;

    /// Search packages by the literal user-entered term
    fn search(&self, term: &str) -> Result<SearchResults>;
}
