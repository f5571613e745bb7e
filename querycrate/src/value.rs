//! Bound values and the per-kind string parsers that produce them.
//!
//! Every filter key carries one of the parsers below. A parser returns `None`
//! when the raw query-string value is not acceptable for the column, which the
//! request translator reports as an invalid parameter for that key.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

/// A value bound to a `?` placeholder of a filter expression.
///
/// User input only ever reaches the database through this type; it is never
/// spliced into the expression text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    Timestamp(DateTime<FixedOffset>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Timestamp(t) => f.write_str(&t.to_rfc3339()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

/// Parses one raw query-string value into a bound value.
pub(crate) type ParseFn = fn(&str) -> Option<Value>;

pub(crate) fn parse_int(s: &str) -> Option<Value> {
    s.parse::<i32>().ok().map(Value::from)
}

pub(crate) fn parse_int64(s: &str) -> Option<Value> {
    s.parse::<i64>().ok().map(Value::Int)
}

/// Exact string match. Empty values are rejected.
pub(crate) fn parse_string(s: &str) -> Option<Value> {
    (!s.is_empty()).then(|| Value::from(s))
}

/// Substring match for `LIKE` keys.
pub(crate) fn parse_like_string(s: &str) -> Option<Value> {
    (!s.is_empty()).then(|| Value::String(format!("%{s}%")))
}

/// RFC 3339 timestamps, e.g. `2024-01-01T00:00:00Z`.
pub(crate) fn parse_timestamp(s: &str) -> Option<Value> {
    DateTime::parse_from_rfc3339(s).ok().map(Value::Timestamp)
}

pub(crate) fn parse_bool(s: &str) -> Option<Value> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(Value::Bool(true)),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(Value::Bool(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_respects_32_bit_range() {
        assert_eq!(parse_int("1998"), Some(Value::Int(1998)));
        assert_eq!(parse_int("-4"), Some(Value::Int(-4)));
        assert_eq!(parse_int("3000000000"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("ten"), None);
    }

    #[test]
    fn test_parse_int64_accepts_large_values() {
        assert_eq!(parse_int64("3000000000"), Some(Value::Int(3_000_000_000)));
        assert_eq!(parse_int64("1.5"), None);
    }

    #[test]
    fn test_string_parsers_reject_empty() {
        assert_eq!(parse_string(""), None);
        assert_eq!(parse_like_string(""), None);
        assert_eq!(parse_string("a8m"), Some(Value::from("a8m")));
        assert_eq!(parse_like_string("a8m"), Some(Value::from("%a8m%")));
    }

    #[test]
    fn test_parse_timestamp_is_strict_rfc3339() {
        let parsed = parse_timestamp("2024-01-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed.to_string(), "2024-01-01T10:00:00+02:00");
        assert_eq!(parse_timestamp("2024-01-01"), None);
        assert_eq!(parse_timestamp("2024-01-01 10:00:00"), None);
    }

    #[test]
    fn test_parse_bool_literals() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(Value::Bool(true)), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(Value::Bool(false)), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::from("a8m"),
            Value::Int(10),
            Value::Bool(true),
        ])
        .unwrap();
        assert_eq!(json, r#"["a8m",10,true]"#);
    }
}
