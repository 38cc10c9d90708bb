//! Loading of raw config data and defaults.
//!
//! Reads JSON5 sources into nested mappings, stacks data and defaults
//! layers, and hands the result to the core [`Config`](attrconf_rs_core::Config)
//! view. Validation itself lives in `attrconf-rs-core`.

mod error;
mod loader;

/// Public error type returned by loading APIs.
pub use error::LoadError;
/// Layered sources and loaded results.
pub use loader::{
    ConfigLayer, ConfigSources, LayerRole, LoadedConfig, load_value_from_path,
    load_value_from_str,
};
