//! Rule set and bindings loader
//!
//! Reads rule sets from YAML files and bindings tables from JSON or YAML.

use super::types::{RuleSet, RuleSetDefinition};
use crate::error::RulegateError;
use crate::rules::{parse_literal, Bindings, Value};
use std::fs;
use std::path::Path;

/// Loads rule sets and bindings from disk
pub struct RuleSetLoader;

impl RuleSetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and compile a rule set from a YAML file
    pub fn load_ruleset<P: AsRef<Path>>(&self, path: P) -> Result<RuleSet, RulegateError> {
        let content = fs::read_to_string(path)?;
        RuleSet::compile(Self::parse_yaml(&content)?)
    }

    /// Parse a rule set definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<RuleSetDefinition, RulegateError> {
        let def: RuleSetDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Load every `*.yaml` / `*.yml` rule set in `dir`, sorted by file name.
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<RuleSet>, RulegateError> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .collect();
        paths.sort();

        let mut sets = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_ruleset(&path) {
                Ok(set) => {
                    log::info!("Loaded rule set '{}' from {:?}", set.name(), path);
                    sets.push(set);
                }
                Err(e) => log::warn!("Skipping rule set {:?}: {}", path, e),
            }
        }
        Ok(sets)
    }

    /// Load a bindings table, choosing the format by file extension
    pub fn load_bindings<P: AsRef<Path>>(&self, path: P) -> Result<Bindings, RulegateError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            _ => Err(RulegateError::UnsupportedFormat(
                path.to_string_lossy().into_owned(),
            )),
        }
    }
}

impl Default for RuleSetLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `KEY=VALUE` argument. The value's type is inferred the same way
/// rule literals are, so `'AGRO'`, `5`, `1.5` and `true` are all accepted.
pub fn parse_binding_arg(arg: &str) -> Result<(String, Value), RulegateError> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| RulegateError::InvalidBinding(format!("missing '=' in '{}'", arg)))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(RulegateError::InvalidBinding(format!(
            "empty name in '{}'",
            arg
        )));
    }

    Ok((key.to_string(), parse_literal(value.trim())))
}
