//! Error types for the Windfield engine
//!
//! Configuration problems and build-time contract violations are reported
//! through [`Error`]. Per-frame queries never fail: once an index is built
//! and a culler is configured, visibility queries always complete.

use std::fmt;

/// Result type for Windfield engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Windfield engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid configuration value (leaf size, depth, padding, LOD table, mode name)
    InvalidConfiguration(String),

    /// Invalid LOD tier table (non-monotonic thresholds or detail ratios)
    InvalidLodTable(String),

    /// Object record violates the build contract (non-finite position,
    /// negative radius, duplicate id, outside the supplied bounds)
    InvalidObject(String),

    /// Index bounds are unusable (inverted or non-finite)
    InvalidBounds(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidLodTable(msg) => write!(f, "Invalid LOD table: {}", msg),
            Error::InvalidObject(msg) => write!(f, "Invalid object: {}", msg),
            Error::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR entry and build an [`Error`] value.
///
/// The variant name is given first, then the log source and a format string.
///
/// ```ignore
/// return Err(engine_err!(InvalidObject, "windfield::SpatialIndex", "duplicate id {}", id));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::windfield::Error::$variant(message)
    }};
}

/// Log an ERROR entry and return early with an [`Error`].
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
