//! Single-pass rule evaluator
//!
//! Parsing and evaluation are fused: each grammar rule consumes its tokens
//! and returns the boolean it denotes. Precedence from loosest to tightest
//! is OR, AND, NOT, then comparisons and parenthesized groups.
//!
//! AND and OR never short-circuit. Skipping the right operand would also
//! skip consuming its tokens and leave the cursor out of sync.

use super::ast::CompareOp;
use super::compare::compare;
use super::cursor::TokenCursor;
use super::lexer::tokenize;
use super::literal::parse_literal;
use super::value::Bindings;
use crate::error::RuleError;

/// Evaluate `expression` against `bindings`
pub fn evaluate(bindings: &Bindings, expression: &str) -> Result<bool, RuleError> {
    let tokens = tokenize(expression);
    let mut evaluator = FusedEvaluator {
        cursor: TokenCursor::new(&tokens),
        bindings,
    };

    let result = evaluator.or()?;
    evaluator.cursor.finish()?;

    log::trace!("{:?} evaluated to {}", expression, result);
    Ok(result)
}

struct FusedEvaluator<'a> {
    cursor: TokenCursor<'a>,
    bindings: &'a Bindings,
}

impl FusedEvaluator<'_> {
    fn or(&mut self) -> Result<bool, RuleError> {
        let mut result = self.and()?;
        while self.cursor.eat("OR") {
            let rhs = self.and()?;
            result = result || rhs;
        }
        Ok(result)
    }

    fn and(&mut self) -> Result<bool, RuleError> {
        let mut result = self.not()?;
        while self.cursor.eat("AND") {
            let rhs = self.not()?;
            result = result && rhs;
        }
        Ok(result)
    }

    fn not(&mut self) -> Result<bool, RuleError> {
        if self.cursor.eat("NOT") {
            return Ok(!self.comparison()?);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<bool, RuleError> {
        if self.cursor.open_group()? {
            let value = self.or()?;
            self.cursor.close_group()?;
            return Ok(value);
        }

        let variable = self.cursor.next_token()?;

        if self.cursor.at_operand_end() {
            return bare_boolean(self.bindings, variable);
        }

        if self.cursor.eat("NOT") {
            self.cursor.expect("NULL")?;
            return Ok(self.bindings.contains(variable));
        }
        if self.cursor.eat("NULL") {
            return Ok(!self.bindings.contains(variable));
        }

        let op_token = self.cursor.next_token()?;
        let op = CompareOp::from_token(op_token)
            .ok_or_else(|| RuleError::UnknownOperator(op_token.to_string()))?;
        let literal = parse_literal(self.cursor.next_token()?);

        let actual = self.bindings.get(variable);
        let result = compare(actual, Some(&literal), op);
        log::trace!(
            "{} ({:?}) {} {:?} -> {}",
            variable,
            actual,
            op,
            literal,
            result
        );
        Ok(result)
    }
}

/// Value of a variable used without an operator
pub(crate) fn bare_boolean(bindings: &Bindings, variable: &str) -> Result<bool, RuleError> {
    bindings
        .get(variable)
        .and_then(|value| value.as_bool())
        .ok_or_else(|| RuleError::BareBoolean(variable.to_string()))
}
