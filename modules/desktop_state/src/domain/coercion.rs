//! Best-guess typing of loosely-typed caller input
//!
//! Automation tools hand over strings for almost everything: integers, floats,
//! booleans, and tuples (YAML has no tuple syntax). Coercion turns those
//! strings into native values; it never fails, unmatched input stays a string
//! and only signature validation may reject it later.

use crate::contract::Value;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::unwrap_used)]
static FLOAT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

// Only 2-element tuples of lowercase words are recognised in strings,
// e.g. `('xkb', 'us')` or `(1, 2.5)`.
#[allow(clippy::unwrap_used)]
static PAIR_TUPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\(['"]?([a-z0-9.]+)['"]?,\s?['"]?([a-z0-9.]+)['"]?\)$"#).unwrap()
});

/// Coerce a raw value into its best-guess native form
pub fn coerce(raw: Value) -> Value {
    match raw {
        Value::Str(s) => coerce_str(s),
        Value::Array(items) => Value::Array(items.into_iter().map(coerce).collect()),
        other @ (Value::Bool(_) | Value::Int(_) | Value::Double(_) | Value::Tuple(_)) => other,
    }
}

/// Apply the string rules in priority order: integer, float, boolean, tuple
fn coerce_str(s: String) -> Value {
    if is_digits(&s) {
        if let Ok(i) = s.parse::<i32>() {
            return Value::Int(i);
        }
    }

    if FLOAT_LITERAL.is_match(&s) {
        if let Ok(d) = s.parse::<f64>() {
            return Value::Double(d);
        }
    }

    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if let Some(caps) = PAIR_TUPLE.captures(&s) {
        let first = coerce_str(caps[1].to_string());
        let second = coerce_str(caps[2].to_string());
        return Value::Tuple(vec![first, second]);
    }

    Value::Str(s)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
