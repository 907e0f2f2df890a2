use std::collections::HashMap;

/// Expand/collapse state for one timeline instance, keyed by task full name.
///
/// Nodes without an entry are expanded. The store never looks at a tree; it
/// is owned by whoever renders the timeline and passed in on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    expanded: HashMap<String, bool>,
    /// Identity of the attempt this state belongs to, if bound
    identity: Option<String>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.get(key).copied().unwrap_or(true)
    }

    /// Flip the node's state; an unknown key goes from expanded to collapsed
    pub fn toggle(&mut self, key: &str) {
        let next = !self.is_expanded(key);
        self.expanded.insert(key.to_string(), next);
    }

    pub fn collapse(&mut self, key: &str) {
        self.expanded.insert(key.to_string(), false);
    }

    pub fn expand(&mut self, key: &str) {
        self.expanded.insert(key.to_string(), true);
    }

    pub fn reset(&mut self) {
        self.expanded.clear();
    }

    /// Bind the state to an attempt, clearing it if the attempt changed.
    /// Returns true if entries were discarded.
    pub fn rebind(&mut self, identity: &str) -> bool {
        if self.identity.as_deref() == Some(identity) {
            return false;
        }
        let had_entries = !self.expanded.is_empty();
        self.reset();
        self.identity = Some(identity.to_string());
        had_entries
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Keys currently collapsed, sorted
    pub fn collapsed_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .expanded
            .iter()
            .filter(|(_, expanded)| !**expanded)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

/// Toggle `key` in `store`
pub fn toggle(store: &mut CollapseState, key: &str) {
    store.toggle(key);
}
