// SPDX-License-Identifier: MIT

//! Compile step for rules evaluated many times
//!
//! Builds an [`Expression`] tree with the same grammar as the fused
//! evaluator, so the text is tokenized and parsed once and the tree can be
//! evaluated against any number of bindings tables.

use super::ast::{CompareOp, Expression};
use super::compare::compare;
use super::cursor::TokenCursor;
use super::evaluator::bare_boolean;
use super::lexer::tokenize;
use super::literal::parse_literal;
use super::value::Bindings;
use crate::error::RuleError;

/// Deepest tree `compile` will build. Operator chains add one level per
/// operator, so this bounds long `A AND B AND ...` rules as well as groups.
pub const MAX_TREE_DEPTH: usize = 1024;

/// Compile `expression` into a reusable tree
pub fn compile(expression: &str) -> Result<Expression, RuleError> {
    let tokens = tokenize(expression);
    let mut compiler = Compiler {
        cursor: TokenCursor::new(&tokens),
    };

    let (expr, _) = compiler.or()?;
    compiler.cursor.finish()?;

    log::debug!("compiled {:?} into {}", expression, expr);
    Ok(expr)
}

struct Compiler<'a> {
    cursor: TokenCursor<'a>,
}

/// A subtree together with its depth
type Node = (Expression, usize);

fn join(
    build: fn(Box<Expression>, Box<Expression>) -> Expression,
    (left, left_depth): Node,
    (right, right_depth): Node,
) -> Result<Node, RuleError> {
    let depth = left_depth.max(right_depth) + 1;
    if depth > MAX_TREE_DEPTH {
        return Err(RuleError::NestingTooDeep(MAX_TREE_DEPTH));
    }
    Ok((build(Box::new(left), Box::new(right)), depth))
}

impl Compiler<'_> {
    fn or(&mut self) -> Result<Node, RuleError> {
        let mut node = self.and()?;
        while self.cursor.eat("OR") {
            let rhs = self.and()?;
            node = join(Expression::Or, node, rhs)?;
        }
        Ok(node)
    }

    fn and(&mut self) -> Result<Node, RuleError> {
        let mut node = self.not()?;
        while self.cursor.eat("AND") {
            let rhs = self.not()?;
            node = join(Expression::And, node, rhs)?;
        }
        Ok(node)
    }

    fn not(&mut self) -> Result<Node, RuleError> {
        if self.cursor.eat("NOT") {
            let (inner, depth) = self.comparison()?;
            return Ok((Expression::Not(Box::new(inner)), depth + 1));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Node, RuleError> {
        if self.cursor.open_group()? {
            let node = self.or()?;
            self.cursor.close_group()?;
            return Ok(node);
        }

        Ok((self.operand()?, 1))
    }

    fn operand(&mut self) -> Result<Expression, RuleError> {
        let variable = self.cursor.next_token()?.to_string();

        if self.cursor.at_operand_end() {
            return Ok(Expression::Bare(variable));
        }

        if self.cursor.eat("NOT") {
            self.cursor.expect("NULL")?;
            return Ok(Expression::NullCheck {
                variable,
                negated: true,
            });
        }
        if self.cursor.eat("NULL") {
            return Ok(Expression::NullCheck {
                variable,
                negated: false,
            });
        }

        let op_token = self.cursor.next_token()?;
        let op = CompareOp::from_token(op_token)
            .ok_or_else(|| RuleError::UnknownOperator(op_token.to_string()))?;
        let literal = parse_literal(self.cursor.next_token()?);

        Ok(Expression::Compare {
            variable,
            op,
            literal,
        })
    }
}

impl Expression {
    /// Evaluate the tree against `bindings`.
    ///
    /// Both operands of AND and OR are evaluated, matching the fused
    /// evaluator: a failing right operand fails the whole expression even
    /// when the left operand already decides the result.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<bool, RuleError> {
        match self {
            Expression::Or(left, right) => {
                let left = left.evaluate(bindings)?;
                let right = right.evaluate(bindings)?;
                Ok(left || right)
            }
            Expression::And(left, right) => {
                let left = left.evaluate(bindings)?;
                let right = right.evaluate(bindings)?;
                Ok(left && right)
            }
            Expression::Not(inner) => Ok(!inner.evaluate(bindings)?),
            Expression::Compare {
                variable,
                op,
                literal,
            } => Ok(compare(bindings.get(variable), Some(literal), *op)),
            Expression::NullCheck { variable, negated } => {
                Ok(bindings.contains(variable) == *negated)
            }
            Expression::Bare(variable) => bare_boolean(bindings, variable),
        }
    }

    /// Names of every variable the expression reads, in source order
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Or(left, right) | Expression::And(left, right) => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expression::Not(inner) => inner.collect_variables(names),
            Expression::Compare { variable, .. }
            | Expression::NullCheck { variable, .. }
            | Expression::Bare(variable) => {
                if !names.contains(&variable.as_str()) {
                    names.push(variable);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::cursor::MAX_NESTING;
    use crate::rules::evaluator::evaluate;
    use crate::rules::value::Value;

    #[test]
    fn test_compile_comparison() {
        let expr = compile("DESK = 'AGRO'").unwrap();
        assert_eq!(
            expr,
            Expression::Compare {
                variable: "DESK".to_string(),
                op: CompareOp::Eq,
                literal: Value::from("AGRO"),
            }
        );
    }

    #[test]
    fn test_compile_null_checks() {
        assert_eq!(
            compile("X NULL").unwrap(),
            Expression::NullCheck {
                variable: "X".to_string(),
                negated: false,
            }
        );
        assert_eq!(
            compile("X not null").unwrap(),
            Expression::NullCheck {
                variable: "X".to_string(),
                negated: true,
            }
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = compile("A AND B OR C").unwrap();
        match expr {
            Expression::Or(left, right) => {
                assert_eq!(
                    *left,
                    Expression::And(
                        Box::new(Expression::Bare("A".to_string())),
                        Box::new(Expression::Bare("B".to_string()))
                    )
                );
                assert_eq!(*right, Expression::Bare("C".to_string()));
            }
            _ => panic!("Expected Or expression"),
        }
    }

    #[test]
    fn test_left_associative() {
        let expr = compile("A OR B OR C").unwrap();
        assert_eq!(expr.to_string(), "((A OR B) OR C)");
    }

    #[test]
    fn test_bare_boolean_is_checked_at_evaluation() {
        let expr = compile("IS_ACTIVE").unwrap();
        assert_eq!(
            expr.evaluate(&Bindings::new()),
            Err(RuleError::BareBoolean("IS_ACTIVE".into()))
        );
        assert_eq!(
            expr.evaluate(&Bindings::new().with("IS_ACTIVE", true)),
            Ok(true)
        );
    }

    #[test]
    fn test_structural_errors_at_compile() {
        assert_eq!(compile(""), Err(RuleError::UnexpectedEnd));
        assert_eq!(compile("(A"), Err(RuleError::expected(")", None)));
        assert_eq!(
            compile("A NOT B"),
            Err(RuleError::expected("NULL", Some("B")))
        );
        assert_eq!(
            compile("A LIKE 'x'"),
            Err(RuleError::UnknownOperator("LIKE".into()))
        );
    }

    #[test]
    fn test_display_recompiles_to_same_tree() {
        for text in [
            "DESK = 'AGRO' AND (STATUS != 'CLOSED' OR NOT PRIORITY NULL)",
            "COST <= 100.5 OR T > -3",
            "NOT (A AND B) OR C NOT NULL",
            "FLAG = TRUE AND NAME = plain",
            "X < 0.00001",
            "X = 100000000000000000000.0",
        ] {
            let expr = compile(text).unwrap();
            assert_eq!(compile(&expr.to_string()).unwrap(), expr, "{}", text);
        }
    }

    #[test]
    fn test_nesting_is_bounded() {
        let deep = format!("{}A{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(
            compile(&deep),
            Err(RuleError::NestingTooDeep(MAX_NESTING))
        );

        let chain = vec!["A"; MAX_TREE_DEPTH + 1].join(" AND ");
        assert_eq!(
            compile(&chain),
            Err(RuleError::NestingTooDeep(MAX_TREE_DEPTH))
        );

        let longest = vec!["A"; MAX_TREE_DEPTH].join(" OR ");
        let expr = compile(&longest).unwrap();
        assert_eq!(expr.evaluate(&Bindings::new().with("A", false)), Ok(false));
    }

    #[test]
    fn test_matches_fused_evaluator() {
        let bindings = Bindings::new()
            .with("DESK", "AGRO")
            .with("STATUS", "OPEN")
            .with("A", true)
            .with("B", false)
            .with("N", 5)
            .with("COST", 100.0);

        for text in [
            "DESK = 'AGRO' AND (STATUS != 'CLOSED' OR NOT PRIORITY NULL)",
            "A AND B OR NOT B",
            "N > 4 AND N <= 5.0 AND COST = 100",
            "A OR MISSING",
            "B AND N",
            "DESK > 'A'",
            "N = '5'",
            "PRIORITY NULL AND NOT (A = false)",
        ] {
            let compiled = compile(text).unwrap().evaluate(&bindings);
            assert_eq!(compiled, evaluate(&bindings, text), "{}", text);
        }
    }

    #[test]
    fn test_variables() {
        let expr = compile("A = 1 AND (B NULL OR A > 2) AND NOT C").unwrap();
        assert_eq!(expr.variables(), vec!["A", "B", "C"]);
    }
}
