// SPDX-License-Identifier: MIT

//! Boolean rule expressions
//!
//! Rules are small boolean expressions evaluated against a table of typed
//! variables:
//! - `DESK = 'AGRO'`
//! - `PRIORITY >= 5 AND COST < 200.5`
//! - `STATUS != 'CLOSED' OR NOT PRIORITY NULL`
//!
//! [`evaluate`] tokenizes, parses and evaluates in one pass. [`compile`]
//! builds an [`Expression`] tree for rules evaluated repeatedly.

mod ast;
mod compare;
mod compiler;
mod cursor;
mod evaluator;
mod lexer;
mod literal;
mod value;

pub use ast::{CompareOp, Expression};
pub use compare::compare;
pub use compiler::compile;
pub use evaluator::evaluate;
pub use lexer::tokenize;
pub use literal::parse_literal;
pub use value::{Bindings, Value};
