// SPDX-License-Identifier: MIT

//! Forward-only cursor over a token sequence

use crate::error::RuleError;

/// Deepest parenthesized group the parsers will descend into
pub const MAX_NESTING: usize = 256;

/// Single-lookahead cursor. Consumed tokens are never revisited.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [&'a str],
    pos: usize,
    depth: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [&'a str]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Consume `(` if present and enter the group it opens
    pub fn open_group(&mut self) -> Result<bool, RuleError> {
        if !self.eat("(") {
            return Ok(false);
        }
        if self.depth >= MAX_NESTING {
            return Err(RuleError::NestingTooDeep(MAX_NESTING));
        }
        self.depth += 1;
        Ok(true)
    }

    /// Require the `)` closing the innermost open group
    pub fn close_group(&mut self) -> Result<(), RuleError> {
        self.expect(")")?;
        self.depth -= 1;
        Ok(())
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the current token, failing at end of input
    pub fn next_token(&mut self) -> Result<&'a str, RuleError> {
        let token = self.peek().ok_or(RuleError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume the current token if it equals `expected`, ignoring ASCII case
    pub fn eat(&mut self, expected: &str) -> bool {
        match self.peek() {
            Some(token) if token.eq_ignore_ascii_case(expected) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    pub fn expect(&mut self, expected: &str) -> Result<(), RuleError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(RuleError::expected(expected, self.peek()))
        }
    }

    /// True when the next token ends an operand: end of input, `AND`, `OR`
    /// or a closing parenthesis
    pub fn at_operand_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => {
                token == ")"
                    || token.eq_ignore_ascii_case("AND")
                    || token.eq_ignore_ascii_case("OR")
            }
        }
    }

    /// Require that every token has been consumed
    pub fn finish(&self) -> Result<(), RuleError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(RuleError::TrailingToken(token.to_string())),
        }
    }
}
