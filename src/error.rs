//! Error types for font resolution.
//!
//! Width resolution never fails; construction fails only on structurally
//! broken input, and text decoding fails only on unsupported encodings.

/// Result type alias for font operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or using a [`Font`](crate::fonts::Font).
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// Referenced object not found by the resolver
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Unsupported feature (raised for unresolved font encodings)
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Font error
    #[error("Font error: {0}")]
    Font(String),

    /// Recursion depth limit exceeded (reference chains, descendant fonts)
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),
}

impl Error {
    pub(crate) fn invalid_type(expected: &str, found: &str) -> Self {
        Error::InvalidObjectType {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
