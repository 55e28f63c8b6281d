use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A case-insensitive set of skill names that remembers the spelling it was first given.
/// Serialized as a plain list of names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillLedger {
    entries: BTreeMap<String, String>,
}

impl SkillLedger {
    pub fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::key(name))
    }

    /// Returns `true` if the name was not present before.
    pub fn insert(&mut self, name: &str) -> bool {
        let key = Self::key(name);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, name.trim().to_string());
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(&Self::key(name)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.values().cloned().collect()
    }
}

impl From<Vec<String>> for SkillLedger {
    fn from(names: Vec<String>) -> Self {
        let mut ledger = SkillLedger::default();
        for name in names.iter().filter(|n| !n.trim().is_empty()) {
            ledger.insert(name);
        }
        ledger
    }
}

impl From<SkillLedger> for Vec<String> {
    fn from(ledger: SkillLedger) -> Self {
        ledger.entries.into_values().collect()
    }
}
