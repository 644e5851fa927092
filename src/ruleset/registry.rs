// SPDX-License-Identifier: MIT

use super::types::RuleSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared table of compiled rule sets keyed by name
#[derive(Clone, Debug)]
pub struct RuleSetRegistry {
    sets: Arc<RwLock<HashMap<String, Arc<RuleSet>>>>,
}

impl RuleSetRegistry {
    pub fn new() -> Self {
        Self {
            sets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a rule set, replacing any previous one with the same name
    pub async fn register(&self, set: RuleSet) {
        let name = set.name().to_string();
        let mut sets = self.sets.write().await;
        if sets.insert(name.clone(), Arc::new(set)).is_some() {
            log::warn!("Replaced existing rule set '{}'", name);
        }
    }

    pub async fn get(&self, name: &str) -> Option<Arc<RuleSet>> {
        let sets = self.sets.read().await;
        sets.get(name).cloned()
    }

    /// Registered names in sorted order
    pub async fn names(&self) -> Vec<String> {
        let sets = self.sets.read().await;
        let mut names: Vec<String> = sets.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for RuleSetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
