// SPDX-License-Identifier: MIT

//! Named rule sets
//!
//! This module provides:
//! - `RuleSet` - an ordered list of compiled, named rules
//! - `RuleSetLoader` - YAML rule sets and JSON/YAML bindings from disk
//! - `RuleSetRegistry` - shared lookup of rule sets by name

mod loader;
mod registry;
mod types;

pub use loader::{parse_binding_arg, RuleSetLoader};
pub use registry::RuleSetRegistry;
pub use types::{Rule, RuleDefinition, RuleOutcome, RuleSet, RuleSetDefinition};
