//! Public surface for attrconf.
//!
//! This crate re-exports the config view, template validation, and source
//! loading crates, and provides a small logging helper for binaries.

/// Re-export for convenience.
pub use attrconf_rs_config as config;
/// Re-export for convenience.
pub use attrconf_rs_core as core;

pub use attrconf_rs_config::{ConfigSources, LoadError, LoadedConfig};
pub use attrconf_rs_core::{
    Check, Config, ConfigError, ErrorMessages, Item, MessageSet, Template, ValidationReport,
    ValueKind, identifier,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
