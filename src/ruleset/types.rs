// SPDX-License-Identifier: MIT

//! Rule set definitions and their compiled form
//!
//! A rule set is an ordered list of named rules read from YAML:
//!
//! ```yaml
//! name: desk-routing
//! description: Routes requests to a desk
//! rules:
//!   - name: agro
//!     when: "DESK = 'AGRO' AND STATUS != 'CLOSED'"
//!   - name: fallback
//!     when: "DESK NOT NULL"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{RuleError, RulegateError};
use crate::rules::{compile, Bindings, Expression};

/// Top-level rule set definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleSetDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<RuleDefinition>,
}

/// A single named rule
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Rule expression text
    pub when: String,
}

/// A rule whose expression has been compiled
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub description: Option<String>,
    pub source: String,
    pub expression: Expression,
}

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub rule: String,
    pub result: Result<bool, RuleError>,
}

/// Compiled rule set, evaluated in declaration order
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    description: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile every rule in `def`
    pub fn compile(def: RuleSetDefinition) -> Result<Self, RulegateError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(def.rules.len());

        for rule in def.rules {
            if !seen.insert(rule.name.clone()) {
                return Err(RulegateError::DuplicateRule(rule.name));
            }
            let expression =
                compile(&rule.when).map_err(|e| RulegateError::invalid_rule(&rule.name, e))?;
            rules.push(Rule {
                name: rule.name,
                description: rule.description,
                source: rule.when,
                expression,
            });
        }

        log::debug!("compiled rule set '{}' with {} rules", def.name, rules.len());
        Ok(Self {
            name: def.name,
            description: def.description,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every rule; one rule's failure does not affect the others
    pub fn evaluate(&self, bindings: &Bindings) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| RuleOutcome {
                rule: rule.name.clone(),
                result: rule.expression.evaluate(bindings),
            })
            .collect()
    }

    /// Name of the first rule in `outcomes` that evaluated to true.
    ///
    /// Same answer as [`RuleSet::first_match`] for outcomes produced by
    /// [`RuleSet::evaluate`], without evaluating the rules again.
    pub fn matched(outcomes: &[RuleOutcome]) -> Result<Option<&str>, RuleError> {
        for outcome in outcomes {
            match &outcome.result {
                Ok(true) => return Ok(Some(outcome.rule.as_str())),
                Ok(false) => {}
                Err(e) => return Err(e.clone()),
            }
        }
        Ok(None)
    }

    /// Name of the first rule that evaluates to true.
    ///
    /// Fails on the first rule that errors before a match is found.
    pub fn first_match(&self, bindings: &Bindings) -> Result<Option<&str>, RuleError> {
        for rule in &self.rules {
            if rule.expression.evaluate(bindings)? {
                log::debug!("rule set '{}' matched rule '{}'", self.name, rule.name);
                return Ok(Some(rule.name.as_str()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(rules: &[(&str, &str)]) -> RuleSetDefinition {
        RuleSetDefinition {
            name: "routing".to_string(),
            description: String::new(),
            rules: rules
                .iter()
                .map(|(name, when)| RuleDefinition {
                    name: name.to_string(),
                    description: None,
                    when: when.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_compile_and_first_match() {
        let set = RuleSet::compile(definition(&[
            ("loc", "DESK = 'LOC'"),
            ("agro", "DESK = 'AGRO' AND STATUS != 'CLOSED'"),
            ("any", "DESK NOT NULL"),
        ]))
        .unwrap();

        let bindings = Bindings::new().with("DESK", "AGRO").with("STATUS", "OPEN");
        assert_eq!(set.first_match(&bindings), Ok(Some("agro")));

        let closed = Bindings::new().with("DESK", "AGRO").with("STATUS", "CLOSED");
        assert_eq!(set.first_match(&closed), Ok(Some("any")));

        assert_eq!(set.first_match(&Bindings::new()), Ok(None));
    }

    #[test]
    fn test_evaluate_reports_each_rule() {
        let set = RuleSet::compile(definition(&[
            ("flag", "IS_ENABLED"),
            ("cost", "COST < 10"),
        ]))
        .unwrap();

        let outcomes = set.evaluate(&Bindings::new().with("COST", 5));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].rule, "flag");
        assert_eq!(
            outcomes[0].result,
            Err(RuleError::BareBoolean("IS_ENABLED".into()))
        );
        assert_eq!(outcomes[1].result, Ok(true));
    }

    #[test]
    fn test_first_match_stops_on_error() {
        let set = RuleSet::compile(definition(&[("flag", "IS_ENABLED"), ("all", "X NULL")]))
            .unwrap();
        assert_eq!(
            set.first_match(&Bindings::new()),
            Err(RuleError::BareBoolean("IS_ENABLED".into()))
        );
    }

    #[test]
    fn test_matched_agrees_with_first_match() {
        let set = RuleSet::compile(definition(&[
            ("loc", "DESK = 'LOC'"),
            ("flag", "IS_ENABLED"),
            ("any", "DESK NOT NULL"),
        ]))
        .unwrap();

        for bindings in [
            Bindings::new().with("DESK", "LOC"),
            Bindings::new().with("DESK", "AGRO").with("IS_ENABLED", false),
            Bindings::new().with("DESK", "AGRO"),
            Bindings::new().with("IS_ENABLED", false),
        ] {
            let outcomes = set.evaluate(&bindings);
            assert_eq!(RuleSet::matched(&outcomes), set.first_match(&bindings));
        }

        let outcomes = set.evaluate(&Bindings::new().with("DESK", "AGRO"));
        assert_eq!(
            RuleSet::matched(&outcomes),
            Err(RuleError::BareBoolean("IS_ENABLED".into()))
        );
        assert_eq!(RuleSet::matched(&[]), Ok(None));
    }

    #[test]
    fn test_invalid_rule_is_named() {
        let err = RuleSet::compile(definition(&[("ok", "A NULL"), ("broken", "(A = 1")]))
            .unwrap_err();
        match err {
            RulegateError::InvalidRule { rule, source } => {
                assert_eq!(rule, "broken");
                assert_eq!(source, RuleError::expected(")", None));
            }
            other => panic!("Expected InvalidRule, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_rule_names() {
        let err = RuleSet::compile(definition(&[("a", "X NULL"), ("a", "Y NULL")])).unwrap_err();
        assert!(matches!(err, RulegateError::DuplicateRule(name) if name == "a"));
    }
}
