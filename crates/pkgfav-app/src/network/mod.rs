//! Networking utilities
//!
//! Shared HTTP client used by registry providers.

pub mod client;

pub use client::HttpClient;
