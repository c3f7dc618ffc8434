//! Configuration constants for the favorites store

/// Storage layout
pub mod keys {
    /// Key holding the serialized list of favorite package names
    pub const FAVORITES: &str = "favorites";

    /// Prefix of the per-package reason keys (`favoriteReason_<packageName>`)
    pub const REASON_PREFIX: &str = "favoriteReason_";
}

/// Key under which the reason for `package_name` is stored
pub fn reason_key(package_name: &str) -> String {
    format!("{}{}", keys::REASON_PREFIX, package_name)
}

/// Inverse of [`reason_key`]; `None` for keys outside the reason namespace
pub fn package_from_reason_key(key: &str) -> Option<&str> {
    key.strip_prefix(keys::REASON_PREFIX)
}
