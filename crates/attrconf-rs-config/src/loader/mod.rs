//! Layered loader for config data and defaults.
//!
//! Reads each source as JSON5, requires a top-level mapping, and merges the
//! layers of each role in order so later layers override earlier ones.

mod layer_io;
mod merge;
mod utils;


use crate::LoadError;
use attrconf_rs_core::Config;
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Which side of the config view a layer feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// Fallback values used when data lacks a key.
    Defaults,
    /// Values that take precedence over defaults.
    Data,
}

/// Metadata about a loaded layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Role the layer was loaded for.
    pub role: LayerRole,
    /// Location on disk.
    pub path: PathBuf,
}

/// Merged data and defaults plus metadata about the layers considered.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Merged data layers.
    pub data: Value,
    /// Merged defaults layers.
    pub defaults: Value,
    /// Metadata for each layer merged, in load order.
    pub layers: Vec<ConfigLayer>,
}

impl LoadedConfig {
    /// Borrow a config view over the merged layers.
    pub fn view(&self) -> Result<Config<'_>, LoadError> {
        Ok(Config::new(&self.data, Some(&self.defaults))?)
    }
}

/// Source declared on [`ConfigSources`].
#[derive(Debug, Clone)]
struct SourceSpec {
    role: LayerRole,
    path: PathBuf,
    required: bool,
}

/// Ordered set of data and defaults sources.
///
/// Relative paths resolve against the base directory. Layers of one role are
/// merged in declaration order; a later layer wins on conflicting keys.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    base_dir: PathBuf,
    sources: Vec<SourceSpec>,
}

impl ConfigSources {
    /// Create an empty source list resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            sources: Vec::new(),
        }
    }

    /// Add a required data layer.
    pub fn with_data(mut self, path: impl AsRef<Path>) -> Self {
        self.push(LayerRole::Data, path, true);
        self
    }

    /// Add a required defaults layer.
    pub fn with_defaults(mut self, path: impl AsRef<Path>) -> Self {
        self.push(LayerRole::Defaults, path, true);
        self
    }

    /// Add a data layer that is skipped when the file does not exist.
    pub fn with_optional_data(mut self, path: impl AsRef<Path>) -> Self {
        self.push(LayerRole::Data, path, false);
        self
    }

    /// Add a defaults layer that is skipped when the file does not exist.
    pub fn with_optional_defaults(mut self, path: impl AsRef<Path>) -> Self {
        self.push(LayerRole::Defaults, path, false);
        self
    }

    fn push(&mut self, role: LayerRole, path: impl AsRef<Path>, required: bool) {
        self.sources.push(SourceSpec {
            role,
            path: path.as_ref().to_path_buf(),
            required,
        });
    }

    /// Load and merge every declared layer.
    pub fn load(&self) -> Result<LoadedConfig, LoadError> {
        let base_dir = utils::normalize_path(&self.base_dir)?;
        debug!("normalized base dir for config load: {}", base_dir.display());
        let mut layers = Vec::new();
        let mut data = Value::Object(Map::new());
        let mut defaults = Value::Object(Map::new());

        for source in &self.sources {
            let path = utils::resolve_path(&base_dir, &source.path);
            let loaded = if source.required {
                Some(layer_io::load_required_layer(source.role, &path)?)
            } else {
                layer_io::load_optional_layer(source.role, &path)?
            };
            let Some(loaded) = loaded else {
                continue;
            };

            let target = match source.role {
                LayerRole::Data => &mut data,
                LayerRole::Defaults => &mut defaults,
            };
            merge::merge_json_values(target, &loaded.value);
            layers.push(loaded.meta);
        }

        info!("config sources loaded (layers={})", layers.len());
        Ok(LoadedConfig {
            data,
            defaults,
            layers,
        })
    }
}

/// Internal representation of a loaded layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

/// Load a single JSON5 source from a path; the root must be a mapping.
pub fn load_value_from_path(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    info!("loading config from path: {}", path.display());
    let contents = fs::read_to_string(path)?;
    layer_io::parse_object(&contents, &path.display().to_string())
}

/// Load a single JSON5 source from raw contents; the root must be a mapping.
pub fn load_value_from_str(contents: &str, label: &str) -> Result<Value, LoadError> {
    debug!("loading config from raw contents (len={})", contents.len());
    layer_io::parse_object(contents, label)
}
