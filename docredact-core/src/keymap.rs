//! Per-path alias table backing the stable-alias model.
//!
//! The table only grows. The counter is shared by every path, so aliases are
//! unique across the whole table, not just within one field.

use std::collections::HashMap;

/// Prefix of every generated alias.
pub const ALIAS_PREFIX: &str = "KEY";

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    paths: HashMap<String, HashMap<String, String>>,
    counter: u64,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alias for `value` at `path`, assigning the next one if this
    /// (path, value) pair has not been seen. The flag is true for new aliases.
    pub fn alias_for(&mut self, path: &str, value: &str) -> (String, bool) {
        let values = self.paths.entry(path.to_string()).or_default();
        if let Some(alias) = values.get(value) {
            return (alias.clone(), false);
        }
        let alias = format!("{}{}", ALIAS_PREFIX, self.counter);
        self.counter += 1;
        values.insert(value.to_string(), alias.clone());
        (alias, true)
    }

    /// Number of aliases handed out so far.
    pub fn count(&self) -> u64 {
        self.counter
    }

    /// Original value → alias table for one path.
    pub fn aliases_for(&self, path: &str) -> Option<&HashMap<String, String>> {
        self.paths.get(path)
    }

    /// Paths that have at least one alias.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_value_same_alias() {
        let mut keymap = Keymap::new();
        assert_eq!(keymap.alias_for("name", "x"), ("KEY0".to_string(), true));
        assert_eq!(keymap.alias_for("name", "y"), ("KEY1".to_string(), true));
        assert_eq!(keymap.alias_for("name", "x"), ("KEY0".to_string(), false));
        assert_eq!(keymap.count(), 2);
    }

    #[test]
    fn test_same_value_on_other_path_gets_new_alias() {
        let mut keymap = Keymap::new();
        let (a, _) = keymap.alias_for("name", "dog");
        let (b, _) = keymap.alias_for("corn", "dog");
        assert_ne!(a, b);
        assert_eq!(keymap.aliases_for("corn").and_then(|m| m.get("dog")), Some(&b));
    }
}
