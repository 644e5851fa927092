// SPDX-License-Identifier: MIT

//! Typed error handling for rulegate
//!
//! `RuleError` covers everything that can go wrong while evaluating a single
//! expression. `RulegateError` wraps it together with the failures of the
//! surrounding layers (rule set loading, bindings files, the server).

use thiserror::Error;

/// Failure raised while tokenizing, parsing or evaluating one expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The token stream ran out while the grammar still required a token
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// A specific token was required at the cursor
    #[error("Expected token '{}', found {}", .expected, describe(.found))]
    ExpectedToken {
        expected: String,
        found: Option<String>,
    },

    /// The token in operator position is not a comparison operator
    #[error("Unknown comparison operator '{0}'")]
    UnknownOperator(String),

    /// A complete expression was followed by more tokens
    #[error("Unexpected trailing token '{0}'")]
    TrailingToken(String),

    /// Parentheses or operator chains nested past the supported depth
    #[error("Expression nested deeper than {0} levels")]
    NestingTooDeep(usize),

    /// A bare identifier was not bound to a Boolean value
    #[error("Boolean variable '{0}' used without comparison")]
    BareBoolean(String),
}

/// Broad classification of a [`RuleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The expression text does not match the grammar
    Structural,
    /// The expression is well formed but misuses a binding
    Semantic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Structural => "structural",
            ErrorKind::Semantic => "semantic",
        }
    }
}

impl RuleError {
    /// Create an expected-token error
    pub fn expected(expected: impl Into<String>, found: Option<&str>) -> Self {
        Self::ExpectedToken {
            expected: expected.into(),
            found: found.map(str::to_string),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleError::BareBoolean(_) => ErrorKind::Semantic,
            _ => ErrorKind::Structural,
        }
    }
}

fn describe(found: &Option<String>) -> String {
    match found {
        Some(token) => format!("'{}'", token),
        None => "end of expression".to_string(),
    }
}

/// Top-level error type for rulegate
#[derive(Debug, Error)]
pub enum RulegateError {
    /// Expression evaluation errors
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// A rule inside a rule set failed to compile
    #[error("Rule '{rule}' is invalid: {source}")]
    InvalidRule {
        rule: String,
        #[source]
        source: RuleError,
    },

    /// Two rules in one rule set share a name
    #[error("Duplicate rule '{0}'")]
    DuplicateRule(String),

    /// Rule set lookup failed
    #[error("Rule set '{0}' not found")]
    RuleSetNotFound(String),

    /// A `KEY=VALUE` binding argument could not be parsed
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Expression text longer than the server accepts
    #[error("Expression is {len} bytes, limit is {limit}")]
    ExpressionTooLong { len: usize, limit: usize },

    /// Bindings file with an extension we do not read
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl RulegateError {
    /// Create an invalid rule error
    pub fn invalid_rule(rule: impl Into<String>, source: RuleError) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            source,
        }
    }
}
