//! Template validation over a [`Config`] view.
//!
//! The validator walks the template and the config in lock-step. Missing
//! keys, failed checks, and sections that are not mappings are recorded as
//! [`FieldError`]s; only a check that fails to evaluate aborts the walk.
//! Message inheritance is resolved per level and passed down by value, so
//! each call starts from the built-in defaults.

use crate::messages::join_path;
use crate::{
    Check, Config, ConfigError, ErrorMessages, FieldMessages, ResolvedMessages, Template,
    TemplateNode, evaluate,
};
use log::{debug, warn};
use serde_json::Value;
use std::fmt;

/// Why a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Missing,
    Invalid,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Fully qualified dotted path of the field.
    pub path: String,
    /// Field key as written in the template.
    pub name: String,
    pub kind: ErrorKind,
    /// Rendered message.
    pub message: String,
    /// Fetched value; `None` for missing fields.
    pub value: Option<Value>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a template validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Whether every field passed.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures in template order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `(path, message)` pairs in template order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|error| (error.path.as_str(), error.message.as_str()))
    }

    /// Message recorded for `path`, if that field failed.
    pub fn message(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.path == path)
            .map(|error| error.message.as_str())
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Receives every failure as it is found.
pub trait ErrorReporter {
    fn report(&mut self, error: &FieldError);
}

/// Reporter that logs each failure at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&mut self, error: &FieldError) {
        warn!("{}", error.message);
    }
}

/// Reporter that keeps the rendered messages.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    pub messages: Vec<String>,
}

impl ErrorReporter for CollectingReporter {
    fn report(&mut self, error: &FieldError) {
        self.messages.push(error.message.clone());
    }
}

impl<F> ErrorReporter for F
where
    F: FnMut(&FieldError),
{
    fn report(&mut self, error: &FieldError) {
        self(error)
    }
}

/// Validate `node` against `template`.
///
/// Returns the report for configuration problems. Errors are returned only
/// when a check fails to evaluate.
pub fn follows_template(
    node: &Config<'_>,
    template: &Template,
    messages: &ErrorMessages,
    reporter: &mut dyn ErrorReporter,
) -> Result<ValidationReport, ConfigError> {
    let resolved = messages.resolve(&ResolvedMessages::default());
    let mut walk = Walk {
        reporter,
        report: ValidationReport::default(),
    };
    walk.level(node, template, Some(messages), &resolved, "")?;
    debug!(
        "template validation finished (errors={})",
        walk.report.errors.len()
    );
    Ok(walk.report)
}

struct Walk<'r> {
    reporter: &'r mut dyn ErrorReporter,
    report: ValidationReport,
}

impl Walk<'_> {
    fn level(
        &mut self,
        node: &Config<'_>,
        template: &Template,
        messages: Option<&ErrorMessages>,
        inherited: &ResolvedMessages,
        path: &str,
    ) -> Result<bool, ConfigError> {
        let mut passed = true;
        for (key, expected) in template.iter() {
            let name = key.as_name();
            let field_path = join_path(path, &name);
            let entry = messages.and_then(|messages| messages.child(&name));
            let field_messages = field_messages(entry, inherited);

            let item = match node.get(key) {
                Ok(item) => item,
                Err(ConfigError::MissingKey { .. }) => {
                    passed = false;
                    self.record(Failure {
                        kind: ErrorKind::Missing,
                        messages: &field_messages,
                        path,
                        field_path,
                        name,
                        value: None,
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            match expected {
                TemplateNode::Section(section) => {
                    let Some(child) = item.as_node() else {
                        passed = false;
                        self.record(Failure {
                            kind: ErrorKind::Invalid,
                            messages: &field_messages,
                            path,
                            field_path,
                            name,
                            value: Some(item.to_value()),
                        });
                        continue;
                    };
                    let (child_messages, child_resolved) = section_messages(entry, inherited);
                    debug!("validating section {field_path}");
                    if !self.level(
                        &child,
                        section,
                        child_messages,
                        &child_resolved,
                        &field_path,
                    )? {
                        passed = false;
                    }
                }
                TemplateNode::Check(check) => {
                    let value = item.as_cow();
                    if !run_check(check, &value, &field_path)? {
                        passed = false;
                        self.record(Failure {
                            kind: ErrorKind::Invalid,
                            messages: &field_messages,
                            path,
                            field_path,
                            name,
                            value: Some(value.into_owned()),
                        });
                    }
                }
            }
        }
        Ok(passed)
    }

    fn record(&mut self, failure: Failure<'_>) {
        let text = match failure.kind {
            ErrorKind::Missing => &failure.messages.missing,
            ErrorKind::Invalid => &failure.messages.invalid,
        };
        let template = format!(
            "{}{}{}",
            failure.messages.prefix, text, failure.messages.suffix
        );
        let message = render(
            &template,
            failure.path,
            &failure.name,
            failure.value.as_ref(),
        );
        let error = FieldError {
            path: failure.field_path,
            name: failure.name,
            kind: failure.kind,
            message,
            value: failure.value,
        };
        self.reporter.report(&error);
        self.report.errors.push(error);
    }
}

struct Failure<'a> {
    kind: ErrorKind,
    messages: &'a ResolvedMessages,
    /// Path of the parent level.
    path: &'a str,
    field_path: String,
    name: String,
    value: Option<Value>,
}

fn run_check(check: &Check, value: &Value, path: &str) -> Result<bool, ConfigError> {
    evaluate(check, value).map_err(|source| ConfigError::Evaluation {
        path: path.to_string(),
        source,
    })
}

/// Messages for a field's own failure.
fn field_messages(entry: Option<&FieldMessages>, inherited: &ResolvedMessages) -> ResolvedMessages {
    match entry {
        Some(FieldMessages::Text(text)) => inherited.with_invalid(text),
        Some(FieldMessages::Tree(tree)) => tree.local().over(inherited),
        None => inherited.clone(),
    }
}

/// Spec and inherited messages for the level below a section.
fn section_messages<'m>(
    entry: Option<&'m FieldMessages>,
    inherited: &ResolvedMessages,
) -> (Option<&'m ErrorMessages>, ResolvedMessages) {
    match entry {
        Some(FieldMessages::Text(text)) => (None, inherited.with_invalid(text)),
        Some(FieldMessages::Tree(tree)) => (Some(tree), tree.resolve(inherited)),
        None => (None, inherited.clone()),
    }
}

/// Substitute `{path}`, `{name}` and `{value}`; `{{` and `}}` are escapes.
///
/// Unknown placeholders are kept verbatim.
fn render(template: &str, path: &str, name: &str, value: Option<&Value>) -> String {
    let mut out = String::with_capacity(template.len() + path.len() + name.len());
    let mut rest = template;
    while let Some(pos) = rest.find(|ch| ch == '{' || ch == '}') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        let placeholder = match tail.find('}') {
            Some(end) if tail.starts_with('{') => Some(end),
            _ => None,
        };
        if let Some(end) = placeholder {
            let substituted = match &tail[1..end] {
                "path" => Some(path.to_string()),
                "name" => Some(name.to_string()),
                "value" => Some(render_value(value)),
                _ => None,
            };
            if let Some(text) = substituted {
                out.push_str(&text);
                rest = &tail[end + 1..];
                continue;
            }
        }
        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn render_substitutes_known_fields() {
        assert_eq!(
            render("{path}.{name} is {value}.", "A", "ASCII", Some(&json!(660))),
            "A.ASCII is 660."
        );
        assert_eq!(
            render("{name}={value}", "", "case", Some(&json!("lowre"))),
            "case=lowre"
        );
        assert_eq!(render("{value}", "", "x", None), "null");
    }

    #[test]
    fn render_keeps_escapes_and_unknown_fields() {
        assert_eq!(render("{{name}} {other} {name", "", "x", None), "{name} {other} {name");
        assert_eq!(render("a}}b}", "", "x", None), "a}b}");
    }
}
