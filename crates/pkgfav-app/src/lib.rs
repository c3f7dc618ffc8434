//! pkgfav App Services
//!
//! Registry search, file-backed persistence, settings, and the state of the
//! search and favorites screens. Depends on the `pkgfav` store crate.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod network;
pub mod providers;
