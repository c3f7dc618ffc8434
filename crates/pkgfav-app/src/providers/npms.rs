//! npms.io search provider
//!
//! Implementation of `PackageProvider` for the npms.io search API
//! (<https://api-docs.npms.io/>).

use crate::config::providers::{NPMS_DEFAULT_SERVER, NPMS_SEARCH_PATH};
use crate::error::Result;
use crate::network::HttpClient;

use super::traits::PackageProvider;
use super::types::SearchResults;

use pkgfav::types::SearchResultItem;
use serde::Deserialize;

// =============================================================================
// Internal API response types (serde)
// =============================================================================

#[derive(Debug, Deserialize)]
struct NpmsSearchResponse {
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    results: Vec<NpmsResult>,
}

#[derive(Debug, Deserialize)]
struct NpmsResult {
    package: NpmsPackage,
}

#[derive(Debug, Deserialize)]
struct NpmsPackage {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<NpmsPackage> for SearchResultItem {
    fn from(pkg: NpmsPackage) -> Self {
        SearchResultItem::new(pkg.name, pkg.description.unwrap_or_default())
    }
}

impl From<NpmsSearchResponse> for SearchResults {
    fn from(resp: NpmsSearchResponse) -> Self {
        SearchResults {
            total: resp.total,
            items: resp
                .results
                .into_iter()
                .map(|r| SearchResultItem::from(r.package))
                .collect(),
        }
    }
}

// =============================================================================
// NpmsProvider
// =============================================================================

/// npms.io API provider
pub struct NpmsProvider {
    client: HttpClient,
    base_url: String,
}

impl NpmsProvider {
    /// Create a provider using the default server
    pub fn new() -> Result<Self> {
        Self::with_base_url(NPMS_DEFAULT_SERVER)
    }

    /// Create a provider with a custom base URL (for testing or mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a full API URL from an endpoint path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl PackageProvider for NpmsProvider {
    fn name(&self) -> &'static str {
        "npms.io"
    }

    fn id(&self) -> &'static str {
        "npms"
    }

    fn search(&self, term: &str) -> Result<SearchResults> {
        tracing::info!("Searching {} for {:?}", self.base_url, term);
        let resp: NpmsSearchResponse = self
            .client
            .get_json(&self.url(NPMS_SEARCH_PATH), &[("q", term)])?;
        Ok(resp.into())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_deserialize_search_response() {
        let json = r#"{
            "total": 2,
            "results": [
                {
                    "package": {
                        "name": "lodash",
                        "version": "4.17.21",
                        "description": "Lodash modular utilities.",
                        "links": { "npm": "https://www.npmjs.com/package/lodash" }
                    },
                    "score": { "final": 0.9 },
                    "searchScore": 100000.4
                },
                {
                    "package": { "name": "lodash-es", "description": "ES module build" }
                }
            ]
        }"#;
        let resp: NpmsSearchResponse = serde_json::from_str(json).unwrap();
        let results: SearchResults = resp.into();

        assert_eq!(results.total, Some(2));
        assert_eq!(
            results.items,
            vec![
                SearchResultItem::new("lodash", "Lodash modular utilities."),
                SearchResultItem::new("lodash-es", "ES module build"),
            ]
        );
    }

    #[test]
    fn test_missing_description_is_empty() {
        let json = r#"{ "results": [ { "package": { "name": "bare" } } ] }"#;
        let results: SearchResults = serde_json::from_str::<NpmsSearchResponse>(json)
            .unwrap()
            .into();
        assert_eq!(results.items[0].description, "");
        assert_eq!(results.total, None);
    }

    #[test]
    fn test_null_description_is_empty() {
        let json = r#"{ "results": [ { "package": { "name": "n", "description": null } } ] }"#;
        let results: SearchResults = serde_json::from_str::<NpmsSearchResponse>(json)
            .unwrap()
            .into();
        assert_eq!(results.items[0].description, "");
    }

    #[test]
    fn test_empty_response() {
        let resp: NpmsSearchResponse = serde_json::from_str("{}").unwrap();
        let results: SearchResults = resp.into();
        assert!(results.is_empty());
    }

    #[test]
    fn test_response_order_preserved() {
        let json = r#"{ "results": [
            { "package": { "name": "z" } },
            { "package": { "name": "a" } },
            { "package": { "name": "m" } }
        ] }"#;
        let results: SearchResults = serde_json::from_str::<NpmsSearchResponse>(json)
            .unwrap()
            .into();
        let names: Vec<_> = results.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    // ---- Provider construction ----

    #[test]
    fn test_provider_with_custom_base_url() {
        let provider = NpmsProvider::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.url(NPMS_SEARCH_PATH), "http://localhost:8080/v2/search");
    }

    #[test]
    fn test_provider_identity() {
        let provider = NpmsProvider::new().unwrap();
        assert_eq!(provider.id(), "npms");
        assert_eq!(provider.name(), "npms.io");
    }

    #[test]
    fn test_unreachable_server_is_remote_fetch_error() {
        let provider = NpmsProvider::with_base_url("http://invalid.invalid.invalid").unwrap();
        let err = provider.search("react").unwrap_err();
        assert!(matches!(err, AppError::RemoteFetch(_)));
    }

    // ---- Integration tests (require network, marked #[ignore]) ----

    #[test]
    #[ignore]
    fn test_integration_search() {
        let provider = NpmsProvider::new().unwrap();
        let results = provider.search("lodash").unwrap();
        assert!(!results.is_empty());
        assert!(results.items.iter().any(|i| i.name == "lodash"));
    }

    #[test]
    #[ignore]
    fn test_integration_search_with_spaces() {
        let provider = NpmsProvider::new().unwrap();
        let results = provider.search("react state management").unwrap();
        assert!(!results.is_empty());
    }
}
