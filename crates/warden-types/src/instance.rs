//! Observed runtime state
//!
//! A RuntimeSnapshot is the set of container names the runtime reported as
//! running at one instant. It is rebuilt every cycle and never diffed against
//! a previous one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A running container, identified only by its name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeInstance {
    pub name: String,
}

impl RuntimeInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Point-in-time set of running instance names.
///
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeSnapshot {
    names: HashSet<String>,
}

impl RuntimeSnapshot {
    /// Whether a running instance is named exactly `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<RuntimeInstance> for RuntimeSnapshot {
    fn from_iter<I: IntoIterator<Item = RuntimeInstance>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|i| i.name).collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for RuntimeSnapshot {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(str::to_string).collect(),
        }
    }
}

impl FromIterator<String> for RuntimeSnapshot {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let snapshot: RuntimeSnapshot = ["mc1-old", "MC1"].into_iter().collect();
        assert!(!snapshot.contains("mc1"));
        assert!(snapshot.contains("MC1"));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let snapshot: RuntimeSnapshot = vec![RuntimeInstance::new("mc1"), RuntimeInstance::new("mc1")]
            .into_iter()
            .collect();
        assert_eq!(snapshot.len(), 1);
    }
}
