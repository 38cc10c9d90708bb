//! Read-only config view with merge-on-read defaults.

use crate::check::Check;
use crate::messages::ErrorMessages;
use crate::template::Template;
use crate::validator::{self, FieldError, LogReporter, ValidationReport};
use crate::{ConfigError, ErrorReporter, Key, identifier};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Borrowed view over a nested mapping plus the defaults at the same position.
///
/// Lookups fall back to defaults when the data lacks a key. Nested mappings
/// are wrapped on every fetch; nothing is cached or copied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config<'a> {
    data: &'a Map<String, Value>,
    defaults: Option<&'a Map<String, Value>>,
}

/// A resolved lookup: either a nested view or a plain value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'a> {
    Node(Config<'a>),
    Value(&'a Value),
}

impl<'a> Config<'a> {
    /// Wrap caller-owned data and optional defaults.
    ///
    /// Both must be JSON objects.
    pub fn new(data: &'a Value, defaults: Option<&'a Value>) -> Result<Self, ConfigError> {
        let data = data.as_object().ok_or_else(|| ConfigError::NotAMapping {
            what: "config data".to_string(),
        })?;
        let defaults = match defaults {
            Some(Value::Object(map)) => Some(map),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(ConfigError::NotAMapping {
                    what: "config defaults".to_string(),
                });
            }
        };
        Ok(Self { data, defaults })
    }

    /// Wrap already-borrowed maps.
    pub fn from_maps(
        data: &'a Map<String, Value>,
        defaults: Option<&'a Map<String, Value>>,
    ) -> Self {
        Self { data, defaults }
    }

    /// Look up a key, falling back to defaults.
    pub fn get(&self, key: impl Into<Key>) -> Result<Item<'a>, ConfigError> {
        let name = key.into().as_name();
        self.resolve(&name).ok_or(ConfigError::MissingKey { key: name })
    }

    /// Look up a key and return the raw value, nested mappings included.
    pub fn get_value(&self, key: impl Into<Key>) -> Result<&'a Value, ConfigError> {
        let name = key.into().as_name();
        self.data
            .get(&name)
            .or_else(|| self.defaults.and_then(|defaults| defaults.get(&name)))
            .ok_or(ConfigError::MissingKey { key: name })
    }

    /// Attribute-style lookup by computed identifier.
    ///
    /// Scans the available keys in [`Config::keys`] order and resolves the
    /// first one whose identifier equals `name`.
    pub fn attr(&self, name: &str) -> Result<Item<'a>, ConfigError> {
        let Some(key) = self.keys().find(|key| identifier(key) == name) else {
            return Err(ConfigError::UnknownAttribute {
                name: name.to_string(),
            });
        };
        debug!("resolved attribute `{name}` to key `{key}`");
        self.resolve(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Available keys: data keys in order, then keys only present in defaults.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        let data = self.data;
        let defaults_only = self
            .defaults
            .into_iter()
            .flat_map(|defaults| defaults.keys())
            .filter(move |key| !data.contains_key(key.as_str()));
        data.keys().chain(defaults_only).map(String::as_str)
    }

    /// Whether a key resolves in data or defaults.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        let name = key.into().as_name();
        self.data.contains_key(&name)
            || self
                .defaults
                .is_some_and(|defaults| defaults.contains_key(&name))
    }

    /// Number of available keys.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// Whether neither data nor defaults hold any key.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.defaults.is_none_or(Map::is_empty)
    }

    /// Materialize the merged view as an owned value.
    pub fn to_value(&self) -> Value {
        let mut merged = Map::with_capacity(self.data.len());
        for key in self.keys() {
            if let Some(item) = self.resolve(key) {
                merged.insert(key.to_string(), item.to_value());
            }
        }
        Value::Object(merged)
    }

    /// Deserialize the merged view into a caller type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// Validate against a template, logging each failure.
    ///
    /// Returns whether every field passed. Use [`Config::validate`] to get
    /// the per-path messages instead.
    pub fn follows_template(
        &self,
        template: &Template,
        messages: &ErrorMessages,
    ) -> Result<bool, ConfigError> {
        self.follows_template_with(template, messages, &mut LogReporter)
    }

    /// Validate against a template, sending each failure to `reporter`.
    pub fn follows_template_with(
        &self,
        template: &Template,
        messages: &ErrorMessages,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<bool, ConfigError> {
        let report = validator::follows_template(self, template, messages, reporter)?;
        Ok(report.passed())
    }

    /// Validate against a template and return the full report.
    pub fn validate(
        &self,
        template: &Template,
        messages: &ErrorMessages,
    ) -> Result<ValidationReport, ConfigError> {
        validator::follows_template(self, template, messages, &mut |_: &FieldError| {})
    }

    /// Evaluate a single check against the value stored at `key`.
    pub fn check(&self, key: impl Into<Key>, check: &Check) -> Result<bool, ConfigError> {
        let key = key.into();
        let path = key.as_name();
        let item = self.get(key)?;
        crate::evaluate(check, &item.as_cow())
            .map_err(|source| ConfigError::Evaluation { path, source })
    }

    fn resolve(&self, name: &str) -> Option<Item<'a>> {
        let default = self.defaults.and_then(|defaults| defaults.get(name));
        let value = self.data.get(name).or(default)?;
        Some(match value {
            Value::Object(map) => Item::Node(Config {
                data: map,
                defaults: default.and_then(Value::as_object),
            }),
            value => Item::Value(value),
        })
    }
}

impl<'a> Item<'a> {
    /// Nested view, if this item is a mapping.
    pub fn as_node(&self) -> Option<Config<'a>> {
        match self {
            Item::Node(node) => Some(*node),
            Item::Value(_) => None,
        }
    }

    /// Plain value, if this item is not a mapping.
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Item::Node(_) => None,
            Item::Value(value) => Some(value),
        }
    }

    /// Nested view or a [`ConfigError::NotAMapping`].
    pub fn node(self) -> Result<Config<'a>, ConfigError> {
        self.as_node().ok_or_else(|| ConfigError::NotAMapping {
            what: "nested lookup".to_string(),
        })
    }

    /// Chained [`Config::get`] on a nested item.
    pub fn get(self, key: impl Into<Key>) -> Result<Item<'a>, ConfigError> {
        self.node()?.get(key)
    }

    /// Chained [`Config::attr`] on a nested item.
    pub fn attr(self, name: &str) -> Result<Item<'a>, ConfigError> {
        self.node()?.attr(name)
    }

    /// Owned value; nested views are merged with their defaults.
    pub fn to_value(&self) -> Value {
        match self {
            Item::Node(node) => node.to_value(),
            Item::Value(value) => (*value).clone(),
        }
    }

    /// Value as seen by checks: borrowed for plain values, merged for views.
    pub(crate) fn as_cow(&self) -> Cow<'a, Value> {
        match self {
            Item::Node(node) => Cow::Owned(node.to_value()),
            Item::Value(value) => Cow::Borrowed(value),
        }
    }
}

impl PartialEq<Value> for Item<'_> {
    fn eq(&self, other: &Value) -> bool {
        match self {
            Item::Value(value) => *value == other,
            Item::Node(node) => node.to_value() == *other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Item};
    use crate::ConfigError;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn letters() -> (Value, Value) {
        (
            json!({ "1": { "lower": "a" }, "a b": 1, "a_b": 2 }),
            json!({ "1": { "upper": "A" }, "z": { "last": true } }),
        )
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        let one = cfg.get(1).expect("1");
        assert_eq!(one.get("lower").expect("lower"), json!("a"));
        assert_eq!(one.get("upper").expect("upper"), json!("A"));
        assert_eq!(cfg.get("z").expect("z").get("last").expect("last"), json!(true));
    }

    #[test]
    fn attribute_and_indexed_access_agree() {
        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        let by_attr = cfg.attr("_1").and_then(|one| one.attr("upper")).expect("attr");
        let by_key = cfg.get(1).and_then(|one| one.get("upper")).expect("key");
        assert_eq!(by_attr, by_key);
    }

    #[test]
    fn attribute_collision_resolves_first_key() {
        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        assert_eq!(cfg.attr("a_b").expect("attr"), json!(1));
        assert_eq!(cfg.get("a_b").expect("key"), json!(2));
    }

    #[test]
    fn missing_lookups_fail() {
        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        assert!(matches!(cfg.get("nope"), Err(ConfigError::MissingKey { key }) if key == "nope"));
        assert!(matches!(
            cfg.attr("nope"),
            Err(ConfigError::UnknownAttribute { name }) if name == "nope"
        ));
    }

    #[test]
    fn keys_list_data_then_defaults_only() {
        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        assert_eq!(cfg.keys().collect::<Vec<_>>(), vec!["1", "a b", "a_b", "z"]);
        assert_eq!(cfg.len(), 4);
        assert!(cfg.contains_key("z"));
        assert!(!cfg.contains_key("y"));
    }

    #[test]
    fn merged_value_includes_nested_defaults() {
        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        assert_eq!(
            cfg.get(1).expect("1").to_value(),
            json!({ "lower": "a", "upper": "A" })
        );
    }

    #[test]
    fn non_mapping_defaults_are_dropped_for_children() {
        let data = json!({ "section": { "a": 1 } });
        let defaults = json!({ "section": 3 });
        let cfg = Config::new(&data, Some(&defaults)).expect("config");

        let Item::Node(section) = cfg.get("section").expect("section") else {
            panic!("expected nested view");
        };
        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn rejects_non_mapping_roots() {
        assert!(matches!(
            Config::new(&json!([1, 2]), None),
            Err(ConfigError::NotAMapping { .. })
        ));
        assert!(matches!(
            Config::new(&json!({}), Some(&json!("x"))),
            Err(ConfigError::NotAMapping { .. })
        ));
    }

    #[test]
    fn deserializes_merged_view() {
        #[derive(serde::Deserialize)]
        struct Letter {
            lower: String,
            upper: String,
        }

        let (data, defaults) = letters();
        let cfg = Config::new(&data, Some(&defaults)).expect("config");
        let letter: Letter = cfg
            .get(1)
            .and_then(|one| one.node())
            .expect("node")
            .deserialize()
            .expect("decode");
        assert_eq!(letter.lower, "a");
        assert_eq!(letter.upper, "A");
    }
}
