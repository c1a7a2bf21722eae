//! Canonical key extraction
//!
//! Walks a dot-notation path through a parsed JSON object and turns the
//! leaf it lands on into the string used as the dedup key.
//!
//! Only strings and numbers can be keys:
//!
//! - **string**: returned unchanged. Any path segments left over are ignored.
//! - **number**: rendered as a fixed-point decimal with six fractional digits,
//!   so `3` and `3.0` produce the same key (`"3.000000"`). Remaining
//!   segments are ignored here too.
//! - **object**: descended into with the next segment. Running out of
//!   segments while still on an object is an error.
//! - **array**, **boolean**, **null**: rejected.

use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

/// Digits after the decimal point in a canonical numeric key
pub const NUMBER_PRECISION: usize = 6;

/// Type identifier for JSON values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a document produced no canonical key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("keys exhausted")]
    PathExhausted,

    #[error("key {0} not found")]
    KeyNotFound(String),

    #[error("no value found: key {0} holds an object")]
    NoValueAtObject(String),

    #[error("unsupported type {kind} at key {key}")]
    UnsupportedType { key: String, kind: JsonKind },
}

/// Resolve `segments` against `doc`, one segment per level.
pub fn resolve(segments: &[String], doc: &Map<String, Value>) -> Result<String, ResolveError> {
    let (head, rest) = segments
        .split_first()
        .ok_or(ResolveError::PathExhausted)?;

    let value = doc
        .get(head)
        .ok_or_else(|| ResolveError::KeyNotFound(head.clone()))?;

    match value {
        // Leftover segments are ignored for scalar leaves
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(canonical_number(n)),
        Value::Object(obj) => {
            if rest.is_empty() {
                return Err(ResolveError::NoValueAtObject(head.clone()));
            }
            resolve(rest, obj)
        }
        Value::Array(_) | Value::Bool(_) | Value::Null => Err(ResolveError::UnsupportedType {
            key: head.clone(),
            kind: JsonKind::from_value(value),
        }),
    }
}

/// Render a number as a fixed-point decimal with six fractional digits.
///
/// Integers are widened to `f64` first, so integers above 2^53 share keys
/// with their nearest representable neighbour.
pub fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) => format!("{:.*}", NUMBER_PRECISION, f),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use regex::Regex;
    use serde_json::json;

    static NUMERIC_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^-?\d+\.\d{6}$").unwrap()
    });

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(obj) => obj,
            other => panic!("fixture is not an object: {}", other),
        }
    }

    fn path(key: &str) -> Vec<String> {
        key.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_string_leaf() {
        let d = doc(json!({"a": "x", "b": 1}));
        assert_eq!(resolve(&path("a"), &d).unwrap(), "x");
    }

    #[test]
    fn test_nested_string_leaf() {
        let d = doc(json!({"user": {"address": {"city": "Lisbon"}}}));
        assert_eq!(resolve(&path("user.address.city"), &d).unwrap(), "Lisbon");
    }

    #[test]
    fn test_string_leaf_ignores_remaining_segments() {
        let d = doc(json!({"a": {"b": "v"}}));
        assert_eq!(resolve(&path("a.b.c"), &d).unwrap(), "v");
        assert_eq!(resolve(&path("a.b.c.d.e"), &d).unwrap(), "v");
    }

    #[test]
    fn test_number_leaf_ignores_remaining_segments() {
        let d = doc(json!({"n": 7}));
        assert_eq!(resolve(&path("n.x"), &d).unwrap(), "7.000000");
    }

    #[test]
    fn test_integer_and_float_collapse() {
        let int_doc: Map<String, Value> = serde_json::from_str(r#"{"n":3}"#).unwrap();
        let float_doc: Map<String, Value> = serde_json::from_str(r#"{"n":3.0}"#).unwrap();

        let a = resolve(&path("n"), &int_doc).unwrap();
        let b = resolve(&path("n"), &float_doc).unwrap();
        assert_eq!(a, "3.000000");
        assert_eq!(a, b);
    }

    #[test]
    fn test_number_formatting() {
        let cases = [
            (json!(3.5), "3.500000"),
            (json!(-2), "-2.000000"),
            (json!(-0.25), "-0.250000"),
            (json!(1.23456789), "1.234568"),
            (json!(0), "0.000000"),
            (json!(1e21), "1000000000000000000000.000000"),
        ];

        for (value, expected) in cases {
            let d = doc(json!({ "n": value }));
            let key = resolve(&path("n"), &d).unwrap();
            assert_eq!(key, expected);
            assert!(NUMERIC_KEY_REGEX.is_match(&key), "bad numeric key: {}", key);
        }
    }

    #[test]
    fn test_large_unsigned_number() {
        let d: Map<String, Value> = serde_json::from_str(r#"{"n":18446744073709551615}"#).unwrap();
        let key = resolve(&path("n"), &d).unwrap();
        assert!(NUMERIC_KEY_REGEX.is_match(&key));
        assert!(key.starts_with("18446744073709551616"));
    }

    #[test]
    fn test_object_leaf_fails() {
        let d = doc(json!({"a": {"b": "v"}}));
        assert_eq!(
            resolve(&path("a"), &d),
            Err(ResolveError::NoValueAtObject("a".to_string()))
        );
    }

    #[test]
    fn test_missing_key() {
        let d = doc(json!({"a": {"b": "v"}}));
        assert_eq!(
            resolve(&path("z"), &d),
            Err(ResolveError::KeyNotFound("z".to_string()))
        );
        assert_eq!(
            resolve(&path("a.z"), &d),
            Err(ResolveError::KeyNotFound("z".to_string()))
        );
    }

    #[test]
    fn test_unsupported_leaves() {
        let d = doc(json!({"arr": [1, 2], "flag": true, "nothing": null}));

        let cases = [
            ("arr", JsonKind::Array),
            ("flag", JsonKind::Boolean),
            ("nothing", JsonKind::Null),
        ];
        for (key, kind) in cases {
            assert_eq!(
                resolve(&path(key), &d),
                Err(ResolveError::UnsupportedType { key: key.to_string(), kind })
            );
        }
    }

    #[test]
    fn test_unsupported_intermediate() {
        let d = doc(json!({"arr": [{"id": "x"}], "flag": false, "nothing": null}));

        for key in ["arr.id", "flag.id", "nothing.id"] {
            let err = resolve(&path(key), &d).unwrap_err();
            assert!(
                matches!(err, ResolveError::UnsupportedType { .. }),
                "{} gave {:?}",
                key,
                err
            );
        }
    }

    #[test]
    fn test_empty_path() {
        let d = doc(json!({"a": "x"}));
        assert_eq!(resolve(&[], &d), Err(ResolveError::PathExhausted));
    }

    #[test]
    fn test_empty_segment_is_literal_key() {
        let d = doc(json!({"": {"id": "blank"}}));
        assert_eq!(resolve(&path(".id"), &d).unwrap(), "blank");
    }

    #[test]
    fn test_resolution_is_pure() {
        let d = doc(json!({"a": {"b": 42}}));
        let first = resolve(&path("a.b"), &d).unwrap();
        let second = resolve(&path("a.b"), &d).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ResolveError::KeyNotFound("x".into()).to_string(), "key x not found");
        assert_eq!(
            ResolveError::UnsupportedType { key: "tags".into(), kind: JsonKind::Array }.to_string(),
            "unsupported type array at key tags"
        );
    }
}
