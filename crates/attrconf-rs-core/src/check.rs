//! Check shapes and the check evaluator.
//!
//! A [`Check`] is a closed set of shapes. Evaluation dispatches in this order:
//! kind, any-of, all-of, call with arguments, bare predicate, and finally
//! literal equality. Call checks are only ever built from a function, so they
//! cannot be confused with an any-of list of checks.

use crate::CheckError;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Single-argument predicate.
pub type PredicateFn = dyn Fn(&Value) -> Result<bool, CheckError> + Send + Sync;
/// Predicate taking the value followed by positional and keyword arguments.
pub type CallFn =
    dyn Fn(&Value, &[Value], &Map<String, Value>) -> Result<bool, CheckError> + Send + Sync;

/// Kind of JSON value matched by [`Check::Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    /// Whole number; booleans do not count.
    Integer,
    Float,
    /// Integer or float.
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Whether `value` is an instance of this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ValueKind::Null => value.is_null(),
            ValueKind::Bool => value.is_boolean(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Float => value.is_f64(),
            ValueKind::Number => value.is_number(),
            ValueKind::String => value.is_string(),
            ValueKind::Array => value.is_array(),
            ValueKind::Object => value.is_object(),
        }
    }
}

/// Validation rule attached to a template leaf.
#[derive(Clone)]
pub enum Check {
    /// Value is of the given kind.
    Kind(ValueKind),
    /// At least one member passes; empty never passes.
    AnyOf(Vec<Check>),
    /// Every member passes; empty always passes.
    AllOf(Vec<Check>),
    /// Function called with the value, then `args` and `kwargs`.
    Call {
        func: Arc<CallFn>,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    },
    /// Function called with the value alone.
    Predicate(Arc<PredicateFn>),
    /// Value equals the literal.
    Equals(Value),
}

impl Check {
    pub fn kind(kind: ValueKind) -> Self {
        Check::Kind(kind)
    }

    /// Logical OR over `checks`, evaluated in order.
    pub fn any(checks: impl IntoIterator<Item = Check>) -> Self {
        Check::AnyOf(checks.into_iter().collect())
    }

    /// Logical AND over `checks`. Evaluation stops at the first failure, so
    /// later members may assume earlier ones held.
    pub fn all(checks: impl IntoIterator<Item = Check>) -> Self {
        Check::AllOf(checks.into_iter().collect())
    }

    /// Infallible single-argument predicate.
    pub fn predicate<F>(func: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Check::Predicate(Arc::new(move |value| Ok(func(value))))
    }

    /// Fallible single-argument predicate; errors propagate to the caller.
    pub fn try_predicate<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, CheckError> + Send + Sync + 'static,
    {
        Check::Predicate(Arc::new(func))
    }

    /// Predicate with positional arguments.
    pub fn call<F>(func: F, args: impl IntoIterator<Item = Value>) -> Self
    where
        F: Fn(&Value, &[Value], &Map<String, Value>) -> Result<bool, CheckError>
            + Send
            + Sync
            + 'static,
    {
        Self::call_with(func, args, Map::new())
    }

    /// Predicate with keyword arguments only.
    pub fn call_with_kwargs<F>(func: F, kwargs: Map<String, Value>) -> Self
    where
        F: Fn(&Value, &[Value], &Map<String, Value>) -> Result<bool, CheckError>
            + Send
            + Sync
            + 'static,
    {
        Self::call_with(func, Vec::new(), kwargs)
    }

    /// Predicate with positional and keyword arguments.
    pub fn call_with<F>(
        func: F,
        args: impl IntoIterator<Item = Value>,
        kwargs: Map<String, Value>,
    ) -> Self
    where
        F: Fn(&Value, &[Value], &Map<String, Value>) -> Result<bool, CheckError>
            + Send
            + Sync
            + 'static,
    {
        Check::Call {
            func: Arc::new(func),
            args: args.into_iter().collect(),
            kwargs,
        }
    }

    pub fn equals(value: impl Into<Value>) -> Self {
        Check::Equals(value.into())
    }

    /// Evaluate this check against a value.
    pub fn evaluate(&self, value: &Value) -> Result<bool, CheckError> {
        evaluate(self, value)
    }
}

/// Evaluate `check` against `value`.
///
/// A predicate returning an error is not a failed check; the error is
/// returned as-is.
pub fn evaluate(check: &Check, value: &Value) -> Result<bool, CheckError> {
    match check {
        Check::Kind(kind) => Ok(kind.matches(value)),
        Check::AnyOf(checks) => {
            for check in checks {
                if evaluate(check, value)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Check::AllOf(checks) => {
            for check in checks {
                if !evaluate(check, value)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Check::Call { func, args, kwargs } => func(value, args.as_slice(), kwargs),
        Check::Predicate(func) => func(value),
        Check::Equals(expected) => Ok(values_equal(value, expected)),
    }
}

/// Equality that treats `97` and `97.0` as the same number at any depth.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) if left.is_f64() || right.is_f64() => {
            left.as_f64() == right.as_f64()
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(left, right)| values_equal(left, right))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, left)| {
                    right
                        .get(key)
                        .is_some_and(|right| values_equal(left, right))
                })
        }
        _ => left == right,
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Check::AnyOf(checks) => f.debug_tuple("AnyOf").field(checks).finish(),
            Check::AllOf(checks) => f.debug_tuple("AllOf").field(checks).finish(),
            Check::Call { args, kwargs, .. } => f
                .debug_struct("Call")
                .field("args", args)
                .field("kwargs", kwargs)
                .finish_non_exhaustive(),
            Check::Predicate(_) => f.write_str("Predicate(..)"),
            Check::Equals(value) => f.debug_tuple("Equals").field(value).finish(),
        }
    }
}

impl From<ValueKind> for Check {
    fn from(kind: ValueKind) -> Self {
        Check::Kind(kind)
    }
}

impl From<Value> for Check {
    fn from(value: Value) -> Self {
        Check::Equals(value)
    }
}

impl From<&str> for Check {
    fn from(value: &str) -> Self {
        Check::Equals(Value::from(value))
    }
}

impl From<i32> for Check {
    fn from(value: i32) -> Self {
        Check::Equals(Value::from(value))
    }
}

impl From<i64> for Check {
    fn from(value: i64) -> Self {
        Check::Equals(Value::from(value))
    }
}

impl From<bool> for Check {
    fn from(value: bool) -> Self {
        Check::Equals(Value::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{Check, ValueKind, evaluate};
    use crate::CheckError;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value, json};

    fn is_alpha() -> Check {
        Check::try_predicate(|value| {
            let text = value
                .as_str()
                .ok_or_else(|| CheckError::new("expected a string"))?;
            Ok(!text.is_empty() && text.chars().all(char::is_alphabetic))
        })
    }

    #[test]
    fn kind_checks_instance() {
        assert_eq!(evaluate(&ValueKind::String.into(), &json!("x")).unwrap(), true);
        assert_eq!(evaluate(&ValueKind::String.into(), &json!(1)).unwrap(), false);
        assert_eq!(evaluate(&ValueKind::Integer.into(), &json!(true)).unwrap(), false);
        assert_eq!(evaluate(&ValueKind::Number.into(), &json!(1.5)).unwrap(), true);
    }

    #[test]
    fn all_of_requires_every_member() {
        let check = Check::all([ValueKind::String.into(), is_alpha()]);
        assert_eq!(evaluate(&check, &json!("ab")).unwrap(), true);
        assert_eq!(evaluate(&check, &json!("a1")).unwrap(), false);
        // The kind check guards the fallible predicate.
        assert_eq!(evaluate(&check, &json!(3)).unwrap(), false);
    }

    #[test]
    fn any_of_needs_one_member() {
        let check = Check::any([ValueKind::String.into(), ValueKind::Integer.into()]);
        assert_eq!(evaluate(&check, &json!(1)).unwrap(), true);
        assert_eq!(evaluate(&check, &json!(null)).unwrap(), false);
    }

    #[test]
    fn empty_collections() {
        assert_eq!(evaluate(&Check::all([]), &json!(1)).unwrap(), true);
        assert_eq!(evaluate(&Check::any([]), &json!(1)).unwrap(), false);
    }

    #[test]
    fn call_prepends_value_to_arguments() {
        let in_range = Check::call(
            |value, args, _| {
                let (Some(value), Some(low), Some(high)) =
                    (value.as_i64(), args[0].as_i64(), args[1].as_i64())
                else {
                    return Err(CheckError::new("expected integers"));
                };
                Ok(low <= value && value <= high)
            },
            [json!(65), json!(90)],
        );
        assert_eq!(evaluate(&in_range, &json!(66)).unwrap(), true);
        assert_eq!(evaluate(&in_range, &json!(660)).unwrap(), false);

        let mut kwargs = Map::new();
        kwargs.insert("prefix".to_string(), json!("ab"));
        let starts = Check::call_with_kwargs(
            |value, args, kwargs| {
                assert!(args.is_empty());
                let prefix = kwargs.get("prefix").and_then(Value::as_str).unwrap_or_default();
                Ok(value.as_str().is_some_and(|text| text.starts_with(prefix)))
            },
            kwargs,
        );
        assert_eq!(evaluate(&starts, &json!("abc")).unwrap(), true);
        assert_eq!(evaluate(&starts, &json!("bc")).unwrap(), false);
    }

    #[test]
    fn literal_equality_is_numeric_aware() {
        assert_eq!(evaluate(&Check::equals(97), &json!(97)).unwrap(), true);
        assert_eq!(evaluate(&Check::equals(97.0), &json!(97)).unwrap(), true);
        assert_eq!(evaluate(&"alpha".into(), &json!("alpha")).unwrap(), true);
        assert_eq!(evaluate(&"alpha".into(), &json!("beta")).unwrap(), false);
    }

    #[test]
    fn nested_literal_equality_is_numeric_aware() {
        let list = Check::equals(json!([97.0, "a"]));
        assert_eq!(evaluate(&list, &json!([97, "a"])).unwrap(), true);
        assert_eq!(evaluate(&list, &json!([97, "a", 1])).unwrap(), false);

        let map = Check::equals(json!({ "ASCII": 65.0, "tags": [1.0] }));
        assert_eq!(evaluate(&map, &json!({ "tags": [1], "ASCII": 65 })).unwrap(), true);
        assert_eq!(evaluate(&map, &json!({ "ASCII": 66, "tags": [1] })).unwrap(), false);
        assert_eq!(evaluate(&map, &json!({ "ASCII": 65 })).unwrap(), false);
    }

    #[test]
    fn predicate_errors_propagate() {
        let err = evaluate(&is_alpha(), &json!(5)).unwrap_err();
        assert_eq!(err.message(), "expected a string");

        let inside_any = Check::any([is_alpha(), ValueKind::Integer.into()]);
        assert!(evaluate(&inside_any, &json!(5)).is_err());
    }
}
