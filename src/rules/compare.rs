//! Typed comparison between a bound value and a literal

use super::ast::CompareOp;
use super::value::Value;

/// Compare `actual` against `expected`.
///
/// Total over every pairing of variants:
/// - Absent on either side is `false` for every operator.
/// - Two Booleans support only `=` and `!=`.
/// - Two numbers are widened to `f64` and support all six operators, with
///   exact equality.
/// - Anything else compares textually and supports only `=` and `!=`.
pub fn compare(actual: Option<&Value>, expected: Option<&Value>, op: CompareOp) -> bool {
    let (actual, expected) = match (actual, expected) {
        (Some(a), Some(e)) => (a, e),
        _ => return false,
    };

    if let (Value::Boolean(a), Value::Boolean(b)) = (actual, expected) {
        return equality(op, a == b);
    }

    if let (Some(a), Some(b)) = (actual.as_number(), expected.as_number()) {
        return match op {
            CompareOp::Eq => a == b,
            CompareOp::NotEq => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Gte => a >= b,
            CompareOp::Lt => a < b,
            CompareOp::Lte => a <= b,
        };
    }

    equality(op, actual.text() == expected.text())
}

fn equality(op: CompareOp, equal: bool) -> bool {
    match op {
        CompareOp::Eq => equal,
        CompareOp::NotEq => !equal,
        _ => false,
    }
}
