// SPDX-License-Identifier: MIT

//! Expression tree produced by the compile step

use super::value::Value;
use std::fmt;

/// A compiled rule expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Logical OR; both operands are always evaluated
    Or(Box<Expression>, Box<Expression>),
    /// Logical AND; both operands are always evaluated
    And(Box<Expression>, Box<Expression>),
    /// Logical NOT
    Not(Box<Expression>),
    /// Comparison expression: variable op literal
    Compare {
        variable: String,
        op: CompareOp,
        literal: Value,
    },
    /// `X NULL` or, when negated, `X NOT NULL`
    NullCheck { variable: String, negated: bool },
    /// Variable used on its own; must be bound to a Boolean
    Bare(String),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// =
    Eq,
    /// !=
    NotEq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
}

impl CompareOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::NotEq),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

/// Renders canonical rule text. Binary nodes are parenthesized, so the
/// output compiles back to an equal tree.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Or(left, right) => write!(f, "({} OR {})", left, right),
            Expression::And(left, right) => write!(f, "({} AND {})", left, right),
            Expression::Not(inner) => write!(f, "NOT {}", inner),
            Expression::Compare {
                variable,
                op,
                literal,
            } => match literal {
                Value::String(s) => write!(f, "{} {} '{}'", variable, op, s),
                other => write!(f, "{} {} {}", variable, op, other),
            },
            Expression::NullCheck {
                variable,
                negated: false,
            } => write!(f, "{} NULL", variable),
            Expression::NullCheck {
                variable,
                negated: true,
            } => write!(f, "{} NOT NULL", variable),
            Expression::Bare(variable) => f.write_str(variable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_display() {
        assert_eq!(format!("{}", CompareOp::Eq), "=");
        assert_eq!(format!("{}", CompareOp::NotEq), "!=");
        assert_eq!(format!("{}", CompareOp::Gt), ">");
        assert_eq!(format!("{}", CompareOp::Gte), ">=");
        assert_eq!(format!("{}", CompareOp::Lt), "<");
        assert_eq!(format!("{}", CompareOp::Lte), "<=");
    }

    #[test]
    fn test_compare_op_from_token() {
        for op in [
            CompareOp::Eq,
            CompareOp::NotEq,
            CompareOp::Gt,
            CompareOp::Gte,
            CompareOp::Lt,
            CompareOp::Lte,
        ] {
            assert_eq!(CompareOp::from_token(&op.to_string()), Some(op));
        }
        assert_eq!(CompareOp::from_token("=="), None);
        assert_eq!(CompareOp::from_token("contains"), None);
    }

    #[test]
    fn test_expression_display() {
        let expr = Expression::And(
            Box::new(Expression::Compare {
                variable: "DESK".to_string(),
                op: CompareOp::Eq,
                literal: Value::from("AGRO"),
            }),
            Box::new(Expression::Not(Box::new(Expression::NullCheck {
                variable: "PRIORITY".to_string(),
                negated: false,
            }))),
        );
        assert_eq!(expr.to_string(), "(DESK = 'AGRO' AND NOT PRIORITY NULL)");
    }
}
