//! Error message specs with scoped inheritance.
//!
//! An [`ErrorMessages`] tree mirrors the template. Each level may carry a
//! general [`MessageSet`] (the `_` entry) that applies to its whole subtree
//! and can be overridden again further down. Individual fields may override
//! their own messages with a plain string (the `invalid` text) or a
//! field-level [`MessageSet`].

use crate::{ConfigError, Key};
use serde_json::{Map, Value};

/// Key holding the general message set at a level.
pub const GENERAL_KEY: &str = "_";

const DEFAULT_INVALID: &str = "is invalid";
const DEFAULT_MISSING: &str = "is missing";
const DEFAULT_PREFIX: &str = "{path}.{name} ";
const DEFAULT_SUFFIX: &str = ".";

/// Partial set of message templates; unset entries are inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSet {
    pub invalid: Option<String>,
    pub missing: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalid(mut self, text: impl Into<String>) -> Self {
        self.invalid = Some(text.into());
        self
    }

    pub fn missing(mut self, text: impl Into<String>) -> Self {
        self.missing = Some(text.into());
        self
    }

    pub fn prefix(mut self, text: impl Into<String>) -> Self {
        self.prefix = Some(text.into());
        self
    }

    pub fn suffix(mut self, text: impl Into<String>) -> Self {
        self.suffix = Some(text.into());
        self
    }

    /// Whether no entry is set.
    pub fn is_empty(&self) -> bool {
        self.invalid.is_none()
            && self.missing.is_none()
            && self.prefix.is_none()
            && self.suffix.is_none()
    }

    /// Resolve against inherited messages; set entries win.
    pub fn over(&self, inherited: &ResolvedMessages) -> ResolvedMessages {
        ResolvedMessages {
            invalid: self
                .invalid
                .clone()
                .unwrap_or_else(|| inherited.invalid.clone()),
            missing: self
                .missing
                .clone()
                .unwrap_or_else(|| inherited.missing.clone()),
            prefix: self
                .prefix
                .clone()
                .unwrap_or_else(|| inherited.prefix.clone()),
            suffix: self
                .suffix
                .clone()
                .unwrap_or_else(|| inherited.suffix.clone()),
        }
    }

    /// Parse a `{invalid, missing, prefix, suffix}` mapping.
    fn from_map(map: &Map<String, Value>, path: &str) -> Result<Self, ConfigError> {
        let mut set = MessageSet::new();
        for (key, value) in map {
            let slot = set
                .slot_mut(key)
                .ok_or_else(|| invalid_messages(path, key, "unknown message key"))?;
            let text = value
                .as_str()
                .ok_or_else(|| invalid_messages(path, key, "expected string"))?;
            *slot = Some(text.to_string());
        }
        Ok(set)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "invalid" => Some(&mut self.invalid),
            "missing" => Some(&mut self.missing),
            "prefix" => Some(&mut self.prefix),
            "suffix" => Some(&mut self.suffix),
            _ => None,
        }
    }
}

/// Fully resolved message templates in effect at one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessages {
    pub invalid: String,
    pub missing: String,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ResolvedMessages {
    fn default() -> Self {
        Self {
            invalid: DEFAULT_INVALID.to_string(),
            missing: DEFAULT_MISSING.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl ResolvedMessages {
    /// Copy with `invalid` replaced.
    pub fn with_invalid(&self, text: &str) -> Self {
        Self {
            invalid: text.to_string(),
            ..self.clone()
        }
    }
}

/// Message override for one key of an [`ErrorMessages`] level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMessages {
    /// Replaces `invalid`, for the field or for a whole section.
    Text(String),
    /// Nested level. Its `local` set applies when the key is a plain field,
    /// its general set and children when the key is a section.
    Tree(ErrorMessages),
}

/// One level of the error message spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessages {
    general: Option<MessageSet>,
    local: MessageSet,
    children: Vec<(Key, FieldMessages)>,
}

impl ErrorMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the general (`_`) messages for this level and its subtree.
    pub fn with_general(mut self, set: MessageSet) -> Self {
        self.general = Some(set);
        self
    }

    /// Override `invalid` for a single field or section.
    pub fn with_text(mut self, key: impl Into<Key>, text: impl Into<String>) -> Self {
        self.insert(key.into(), FieldMessages::Text(text.into()));
        self
    }

    /// Field-level messages for a single field.
    pub fn with_field(mut self, key: impl Into<Key>, set: MessageSet) -> Self {
        let tree = ErrorMessages {
            local: set,
            ..ErrorMessages::default()
        };
        self.insert(key.into(), FieldMessages::Tree(tree));
        self
    }

    /// Messages for a nested section.
    pub fn with_section(mut self, key: impl Into<Key>, section: ErrorMessages) -> Self {
        self.insert(key.into(), FieldMessages::Tree(section));
        self
    }

    /// Register `messages` for `key`, replacing an earlier entry of the same name.
    fn insert(&mut self, key: Key, messages: FieldMessages) {
        let name = key.as_name();
        match self.children.iter_mut().find(|(existing, _)| existing.as_name() == name) {
            Some(entry) => entry.1 = messages,
            None => self.children.push((key, messages)),
        }
    }

    /// General messages set at this level, if any.
    pub fn general(&self) -> Option<&MessageSet> {
        self.general.as_ref()
    }

    /// Field-level messages used when this level describes a plain field.
    pub fn local(&self) -> &MessageSet {
        &self.local
    }

    /// Override registered for `name`.
    pub fn child(&self, name: &str) -> Option<&FieldMessages> {
        self.children
            .iter()
            .find(|(key, _)| key.as_name() == name)
            .map(|(_, messages)| messages)
    }

    /// Resolve this level's general set over inherited messages.
    pub fn resolve(&self, inherited: &ResolvedMessages) -> ResolvedMessages {
        match &self.general {
            Some(general) => general.over(inherited),
            None => inherited.clone(),
        }
    }

    /// Build messages from a parsed nested mapping.
    ///
    /// `_` must be a message mapping. Any other key holds either a string
    /// (an `invalid` override) or a nested mapping. String entries named
    /// `invalid`, `missing`, `prefix` or `suffix` also fill the level's
    /// field-level set, so the same mapping works for a field or a section.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        Self::from_value_at(value, "")
    }

    fn from_value_at(value: &Value, path: &str) -> Result<Self, ConfigError> {
        let map = value.as_object().ok_or_else(|| ConfigError::InvalidMessages {
            path: display_path(path),
            message: "expected mapping".to_string(),
        })?;

        let mut messages = ErrorMessages::new();
        for (key, entry) in map {
            let entry_path = join_path(path, key);
            if key == GENERAL_KEY {
                let general = entry
                    .as_object()
                    .ok_or_else(|| invalid_messages(path, key, "expected mapping"))?;
                messages.general = Some(MessageSet::from_map(general, &entry_path)?);
                continue;
            }
            match entry {
                Value::String(text) => {
                    if let Some(slot) = messages.local.slot_mut(key) {
                        *slot = Some(text.clone());
                    }
                    messages
                        .children
                        .push((Key::from(key), FieldMessages::Text(text.clone())));
                }
                Value::Object(_) => {
                    let nested = Self::from_value_at(entry, &entry_path)?;
                    messages
                        .children
                        .push((Key::from(key), FieldMessages::Tree(nested)));
                }
                _ => return Err(invalid_messages(path, key, "expected string or mapping")),
            }
        }
        Ok(messages)
    }
}

/// Join nested paths for error messages.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.to_string()
    }
}

fn invalid_messages(path: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidMessages {
        path: join_path(path, key),
        message: message.to_string(),
    }
}
