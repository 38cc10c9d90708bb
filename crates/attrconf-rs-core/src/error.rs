//! Error types for config access and template validation.

use thiserror::Error;

/// Errors returned by config lookups and validation.
///
/// Validation outcomes (missing fields, failed checks, wrong shapes) are never
/// reported through this type; they end up in a
/// [`ValidationReport`](crate::ValidationReport).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key is absent from both data and defaults.
    #[error("missing key: {key}")]
    MissingKey { key: String },
    /// No available key maps to the requested identifier.
    #[error("no key maps to attribute `{name}`")]
    UnknownAttribute { name: String },
    /// A nested mapping was expected.
    #[error("expected a mapping for {what}")]
    NotAMapping { what: String },
    /// A check raised while evaluating a field.
    #[error("check failed to evaluate at {path}: {source}")]
    Evaluation {
        path: String,
        #[source]
        source: CheckError,
    },
    /// An error message spec has an unsupported shape.
    #[error("invalid error messages at {path}: {message}")]
    InvalidMessages { path: String, message: String },
    /// Deserializing the merged view failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
}

/// Error raised by a check predicate.
///
/// This is distinct from a predicate returning `false`: it means the check
/// itself is malformed for the value it was given.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CheckError {
    message: String,
}

impl CheckError {
    /// Create a check error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}
