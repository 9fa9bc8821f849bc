//! Error types for the storage and configuration boundaries.
//!
//! Nothing in this crate surfaces these to the user. They exist so the
//! capability layers can report what went wrong and the consent layer can
//! log it before degrading to the fail-closed default.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failures reported by a [`crate::storage::StorageArea`] or while decoding a
/// stored consent record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage cannot be reached (no window, disabled by browser settings,
    /// security exception on access).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing store refused the write (quota exceeded, private mode).
    #[error("storage write rejected: {0}")]
    WriteRejected(String),

    /// The stored value is not a consent record.
    #[error("malformed consent record: {0}")]
    Malformed(String),
}

/// Rejected build-time configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The vendor id is the unedited placeholder shipped in templates.
    #[error("{var} is still the placeholder value '{value}'")]
    Placeholder { var: &'static str, value: String },

    /// The vendor id contains characters that cannot appear in a tag URL.
    #[error("{var} has invalid id '{value}' (expected ASCII letters, digits, '-' or '_')")]
    InvalidId { var: &'static str, value: String },

    /// A numeric setting could not be parsed.
    #[error("{var} is not a valid number: '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    /// A boolean setting was neither `true` nor `false`.
    #[error("{var} is not a valid boolean: '{value}'")]
    InvalidBool { var: &'static str, value: String },
}
