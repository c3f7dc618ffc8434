//! Package search providers

pub mod npms;
pub mod traits;
pub mod types;

// Re-exports
pub use npms::NpmsProvider;
pub use traits::PackageProvider;
pub use types::SearchResults;
