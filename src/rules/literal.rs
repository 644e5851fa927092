//! Literal value inference
//!
//! A literal token becomes, in priority order: a Boolean (`true`/`false`,
//! any case), a quoted String, a Float (numeric shape with a `.`), an
//! Integer, or finally a String holding the token's own text.

use super::value::Value;

pub fn parse_literal(token: &str) -> Value {
    if token.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        return Value::String(token[1..token.len() - 1].to_string());
    }

    if looks_numeric(token) {
        let parsed = if token.contains('.') {
            token.parse::<f64>().ok().map(Value::Float)
        } else {
            token.parse::<i64>().ok().map(Value::Integer)
        };
        if let Some(value) = parsed {
            return value;
        }
    }

    Value::String(token.to_string())
}

/// Leading digit, optionally after a minus sign
fn looks_numeric(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    unsigned.starts_with(|c: char| c.is_ascii_digit())
}
