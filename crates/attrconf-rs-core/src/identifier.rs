//! Keys and the key-to-identifier mapping used by attribute-style access.

use std::fmt;

/// Mapping key accepted at every lookup seam.
///
/// Config data is held as JSON objects, so integer keys are stored and looked
/// up by their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Int(i64),
}

impl Key {
    /// String form used for lookups, paths, and identifiers.
    pub fn as_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(value) => f.write_str(value),
            Key::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Key::Str(value.clone())
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Key::Str(value.to_string()), Key::Int)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Key::Str(value.to_string()), Key::Int)
    }
}

/// Map an arbitrary key to an attribute-safe identifier.
///
/// An empty key becomes `_`, a leading ASCII digit gets a `_` prefix, and
/// every ASCII punctuation or whitespace character is replaced with `_`.
/// Other numeric characters (`½`, `Ⅻ`) are not digits and are kept as-is.
///
/// Distinct keys can collide (`"a b"` and `"a_b"` both give `a_b`); use
/// [`Config::get`](crate::Config::get) when a key must be addressed exactly.
pub fn identifier(key: impl fmt::Display) -> String {
    let name = key.to_string();
    if name.is_empty() {
        return "_".to_string();
    }

    let mut out = String::with_capacity(name.len() + 1);
    if name.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        out.push('_');
    }
    out.extend(name.chars().map(|ch| {
        if is_separator(ch) {
            '_'
        } else {
            ch
        }
    }));
    out
}

/// ASCII punctuation plus the ASCII whitespace set (including vertical tab).
fn is_separator(ch: char) -> bool {
    ch.is_ascii_punctuation() || matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

#[cfg(test)]
mod tests {
    use super::{Key, identifier};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_key_maps_to_underscore() {
        assert_eq!(identifier(""), "_");
    }

    #[test]
    fn leading_digit_is_prefixed() {
        assert_eq!(identifier("1x"), "_1x");
        assert_eq!(identifier(1337), "_1337");
        assert_eq!(identifier(Key::Int(7)), "_7");
    }

    #[test]
    fn non_digit_numerics_are_not_prefixed() {
        assert_eq!(identifier("½x"), "½x");
        assert_eq!(identifier("Ⅻ"), "Ⅻ");
    }

    #[test]
    fn wide_integer_keys_use_decimal_form() {
        assert_eq!(Key::from(7_u64), Key::Int(7));
        assert_eq!(Key::from(3_usize).as_name(), "3");
        assert_eq!(Key::from(u64::MAX).as_name(), u64::MAX.to_string());
        assert_eq!(identifier(Key::from(u64::MAX)), format!("_{}", u64::MAX));
    }

    #[test]
    fn punctuation_and_whitespace_are_replaced() {
        assert_eq!(identifier("a-b.c d"), "a_b_c_d");
        assert_eq!(identifier("tab\there"), "tab_here");
        assert_eq!(identifier("v\x0bt"), "v_t");
        assert_eq!(identifier("-1"), "_1");
    }

    #[test]
    fn collisions_are_kept() {
        assert_eq!(identifier("a b"), identifier("a_b"));
    }

    #[test]
    fn output_never_contains_separators() {
        for key in ["", " ", "!@#", "9 lives", "ünï-cödé", "a\nb"] {
            let ident = identifier(key);
            assert!(!ident.is_empty());
            assert!(
                !ident
                    .chars()
                    .any(|ch| (ch.is_ascii_punctuation() && ch != '_') || ch.is_ascii_whitespace()),
                "{ident:?}"
            );
            assert_eq!(ident, identifier(key));
        }
    }
}
