//! Attribute-style configuration access and template validation.
//!
//! This crate owns the read-only [`Config`] view (data plus defaults), the
//! identifier mapping used for attribute-style lookups, and the template
//! validator that checks a config tree and renders human-readable errors.

pub mod check;
pub mod error;
mod identifier;
pub mod messages;
mod node;
pub mod template;
pub mod validator;

/// Check shapes and the evaluator.
pub use check::{Check, ValueKind, evaluate};
/// Error types for access, evaluation, and message specs.
pub use error::{CheckError, ConfigError};
/// Key type and identifier mapping.
pub use identifier::{Key, identifier};
/// Error message specs and their resolved form.
pub use messages::{ErrorMessages, FieldMessages, MessageSet, ResolvedMessages};
/// Read-only config view.
pub use node::{Config, Item};
/// Template tree.
pub use template::{Template, TemplateNode};
/// Validation entry points and reporting.
pub use validator::{
    CollectingReporter, ErrorKind, ErrorReporter, FieldError, LogReporter, ValidationReport,
    follows_template,
};
