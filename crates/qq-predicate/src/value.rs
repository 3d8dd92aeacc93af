//! Value coercion and comparison.
//!
//! Rule values arrive as raw JSON literals. They are coerced once, at compile
//! time, into a [`Literal`] according to the field's [`SemanticType`], then
//! compared against record values for every scanned record.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::catalog::SemanticType;

/// A rule value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// JSON `null` (or a missing value).
    Null,
    /// Boolean.
    Bool(bool),
    /// Number. May be NaN when coercion failed.
    Number(f64),
    /// String.
    Text(String),
    /// Array or object passed through from a text field.
    Json(Value),
}

impl Literal {
    /// Wraps a raw JSON value without coercion.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => Literal::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Literal::Text(s.clone()),
            other => Literal::Json(other.clone()),
        }
    }

    /// Returns true for values that count as "no value": null and the empty string.
    pub fn is_absent(&self) -> bool {
        match self {
            Literal::Null => true,
            Literal::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Converts the value to the string used by the substring operators.
    pub fn to_display_string(&self) -> Cow<'_, str> {
        match self {
            Literal::Null => Cow::Borrowed("null"),
            Literal::Bool(true) => Cow::Borrowed("true"),
            Literal::Bool(false) => Cow::Borrowed("false"),
            Literal::Number(n) => Cow::Owned(number_to_string(*n)),
            Literal::Text(s) => Cow::Borrowed(s),
            Literal::Json(v) => display_string(v),
        }
    }
}

/// Coerces a raw rule value into the representation used for comparisons.
///
/// - `number`: lenient float parsing; anything unparseable becomes NaN.
/// - `boolean`: `true` only for JSON `true` or the string `"true"`.
/// - `text` / `date`: passed through unchanged.
pub fn coerce(raw: &Value, semantic_type: SemanticType) -> Literal {
    match semantic_type {
        SemanticType::Number => Literal::Number(parse_number(raw)),
        SemanticType::Boolean => {
            Literal::Bool(matches!(raw, Value::Bool(true)) || raw.as_str() == Some("true"))
        }
        SemanticType::Text | SemanticType::Date => Literal::from_json(raw),
    }
}

fn parse_number(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float(s),
        _ => f64::NAN,
    }
}

/// Parses the longest numeric prefix of `input`, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fractional part, an
/// optional exponent, and `Infinity`. Returns NaN when no digits are found.
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Returns true if a record value counts as missing: null or the empty string.
///
/// Fields absent from the record are passed as `None` and are missing too.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Orders a record value against a coerced literal.
///
/// Only values of the same kind are ordered: numbers (IEEE-754, so NaN is
/// unordered), strings (lexically, by bytes) and booleans (`false < true`).
/// Any other pairing is unordered.
pub fn compare(record: &Value, literal: &Literal) -> Option<Ordering> {
    match (record, literal) {
        (Value::Number(n), Literal::Number(m)) => n.as_f64()?.partial_cmp(m),
        (Value::String(s), Literal::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        (Value::Bool(a), Literal::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Converts a record value to the string used by the substring operators.
pub fn display_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Cow::Owned(number_to_string(f)),
            None => Cow::Owned(n.to_string()),
        },
        Value::String(s) => Cow::Borrowed(s),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Cow::Borrowed(""),
                    other => display_string(other),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

/// Formats a number the way the query editor displays it: integral values
/// without a fractional part, `NaN` and `Infinity` spelled out.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}
