//! IO helpers for reading source layers from disk.

use super::{ConfigLayer, LayerRole, LoadedLayer};
use crate::LoadError;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load an optional layer if the provided path exists.
pub(super) fn load_optional_layer(
    role: LayerRole,
    path: &Path,
) -> Result<Option<LoadedLayer>, LoadError> {
    if !path.exists() {
        debug!(
            "optional layer missing (role={:?}, path={})",
            role,
            path.display()
        );
        return Ok(None);
    }

    Ok(Some(load_required_layer(role, path)?))
}

/// Load and check a required layer from disk.
pub(super) fn load_required_layer(role: LayerRole, path: &Path) -> Result<LoadedLayer, LoadError> {
    debug!(
        "loading config layer (role={:?}, path={})",
        role,
        path.display()
    );
    let contents = fs::read_to_string(path)?;
    let value = parse_object(&contents, &layer_label(role, path))?;
    Ok(LoadedLayer {
        meta: ConfigLayer {
            role,
            path: path.to_path_buf(),
        },
        value,
    })
}

/// Parse JSON5 contents and require a top-level mapping.
pub(super) fn parse_object(contents: &str, label: &str) -> Result<Value, LoadError> {
    let value: Value = json5::from_str(contents)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(LoadError::InvalidRoot {
            label: label.to_string(),
        })
    }
}

/// Build a user-friendly label for loading errors.
pub(super) fn layer_label(role: LayerRole, path: &Path) -> String {
    let name = match role {
        LayerRole::Defaults => "defaults",
        LayerRole::Data => "data",
    };
    format!("{name}({})", path.display())
}
