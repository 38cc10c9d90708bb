//! Error types for config loading.

use thiserror::Error;

/// Errors returned while loading config sources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a source file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a source failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The top level of a source is not a mapping.
    #[error("invalid config root in {label}: expected object")]
    InvalidRoot { label: String },
    /// Building the config view failed.
    #[error(transparent)]
    Config(#[from] attrconf_rs_core::ConfigError),
}
