//! Depth-first traversal that applies rules to a document in place.
//!
//! Every node gets a dot-path built from its ancestors' keys and indices.
//! A node's rule is either inherited from a matched ancestor or looked up
//! with [`RuleSet::find_match`]. Once a container matches, its rule governs
//! the whole subtree: `Delete` drops the container, any other model is
//! handed down to every descendant in place of their own lookups.
//!
//! Sequences are compacted after their elements are visited, so a removal
//! never shifts an unvisited element; paths always use original indices.
//!
//! License: MIT OR APACHE 2.0

use log::trace;
use indexmap::IndexMap;

use crate::document::Node;
use crate::errors::{RedactError, Result};
use crate::keymap::Keymap;
use crate::redaction_log::{log_removal_debug, log_substitution_debug};
use crate::rules::compiler::RuleSet;
use crate::rules::ModelKind;
use crate::stats::RedactionStats;
use crate::substitution::{substitute, Replacements, Substitution};

/// Default nesting limit for a single document.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What the parent should do with a child after it was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Keep,
    Remove,
}

/// Borrowed view of a context's state for the duration of one document.
pub struct TreeWalker<'a> {
    /// `None` means only-leaf mode: every leaf is masked.
    pub rules: Option<&'a RuleSet>,
    pub keymap: &'a mut Keymap,
    pub replacements: &'a Replacements,
    pub stats: &'a mut RedactionStats,
    pub max_depth: usize,
}

/// Joins a parent path and a key or index with `.`.
pub fn child_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

impl TreeWalker<'_> {
    /// Walks `root`. Map and sequence roots are walked with an empty prefix;
    /// a leaf root has no path and is left untouched.
    pub fn walk_document(&mut self, root: &mut Node) -> Result<()> {
        match root {
            Node::Map(map) => self.walk_map("", map, None, 1),
            Node::Sequence(items) => self.walk_sequence("", items, None, 1),
            other => {
                trace!("Document root is a bare {}; nothing to walk.", other.kind());
                Ok(())
            }
        }
    }

    fn only_leaf(&self) -> bool {
        self.rules.is_none()
    }

    fn find_match(&self, path: &str) -> Option<usize> {
        let index = self.rules.and_then(|rules| rules.find_match(path));
        if let Some(i) = index {
            trace!("Path '{}' matched rule #{}.", path, i);
        }
        index
    }

    fn model_at(&self, index: usize) -> ModelKind {
        self.rules
            .map_or(ModelKind::Unresolved, |rules| rules.model_at(index))
    }

    fn walk_map(
        &mut self,
        path: &str,
        map: &mut IndexMap<String, Node>,
        inherited: Option<usize>,
        depth: usize,
    ) -> Result<()> {
        let mut keep = Vec::with_capacity(map.len());
        for (key, child) in map.iter_mut() {
            let child_path = child_path(path, key);
            keep.push(self.process_item(&child_path, child, inherited, depth)? == Disposition::Keep);
        }
        let mut flags = keep.into_iter();
        map.retain(|_, _| flags.next().unwrap_or(true));
        Ok(())
    }

    fn walk_sequence(
        &mut self,
        path: &str,
        items: &mut Vec<Node>,
        inherited: Option<usize>,
        depth: usize,
    ) -> Result<()> {
        let mut keep = Vec::with_capacity(items.len());
        for (index, child) in items.iter_mut().enumerate() {
            let child_path = child_path(path, &index.to_string());
            keep.push(self.process_item(&child_path, child, inherited, depth)? == Disposition::Keep);
        }
        let mut flags = keep.into_iter();
        items.retain(|_| flags.next().unwrap_or(true));
        Ok(())
    }

    fn process_item(
        &mut self,
        path: &str,
        node: &mut Node,
        inherited: Option<usize>,
        depth: usize,
    ) -> Result<Disposition> {
        if depth > self.max_depth {
            return Err(RedactError::DepthExceeded {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }

        let ridx = inherited.or_else(|| self.find_match(path));

        if matches!(node, Node::OpaqueIdentifier(_)) {
            *node = Node::Null;
            self.stats.erased_identifiers += 1;
            return Ok(Disposition::Keep);
        }

        if node.is_container() {
            if ridx.map(|i| self.model_at(i)) == Some(ModelKind::Delete) {
                log_removal_debug(path, node);
                self.stats.deleted += 1;
                return Ok(Disposition::Remove);
            }
            match node {
                Node::Map(map) => self.walk_map(path, map, ridx, depth + 1)?,
                Node::Sequence(items) => self.walk_sequence(path, items, ridx, depth + 1)?,
                _ => {}
            }
            return Ok(Disposition::Keep);
        }

        let model = match ridx {
            Some(i) => self.model_at(i),
            None if self.only_leaf() => ModelKind::MaskSameLength,
            // Unmatched leaves, temporals included, are left alone outside only-leaf mode.
            None => return Ok(Disposition::Keep),
        };
        Ok(self.apply_leaf(path, node, model))
    }

    fn apply_leaf(&mut self, path: &str, node: &mut Node, model: ModelKind) -> Disposition {
        match substitute(model, node, path, self.keymap, self.replacements) {
            Substitution::Keep => Disposition::Keep,
            Substitution::Replace(replacement) => {
                log_substitution_debug(path, model, node, &replacement);
                self.stats.masked += 1;
                *node = replacement;
                Disposition::Keep
            }
            Substitution::Alias { alias, created } => {
                let replacement = Node::String(alias);
                log_substitution_debug(path, model, node, &replacement);
                self.stats.aliased += 1;
                if created {
                    self.stats.aliases_created += 1;
                }
                *node = replacement;
                Disposition::Keep
            }
            Substitution::Remove => {
                log_removal_debug(path, node);
                self.stats.deleted += 1;
                Disposition::Remove
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::compiler::compile_rules;
    use crate::rules::RuleSpec;
    use serde_json::json;

    fn walk(doc: serde_json::Value, rules: Option<&RuleSet>, max_depth: usize) -> Result<Node> {
        let mut node = Node::from(doc);
        let mut keymap = Keymap::new();
        let replacements = Replacements::default();
        let mut stats = RedactionStats::default();
        let mut walker = TreeWalker {
            rules,
            keymap: &mut keymap,
            replacements: &replacements,
            stats: &mut stats,
            max_depth,
        };
        walker.walk_document(&mut node)?;
        Ok(node)
    }

    #[test]
    fn test_child_path_joins_with_dots() {
        assert_eq!(child_path("", "a"), "a");
        assert_eq!(child_path("nestedArray", "1"), "nestedArray.1");
        assert_eq!(child_path("nestedArray.1", "ssn"), "nestedArray.1.ssn");
    }

    #[test]
    fn test_sequence_indices_are_path_segments() {
        let rules = compile_rules(&[RuleSpec::new("^list\\.1$", "mask")]).unwrap();
        let node = walk(json!({"list": ["aa", "bb", "cc"]}), Some(&rules), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(node.to_json(), json!({"list": ["aa", "XX", "cc"]}));
    }

    #[test]
    fn test_sequence_root_uses_bare_indices() {
        let rules = compile_rules(&[RuleSpec::new("^0\\.name$", "mask")]).unwrap();
        let node = walk(json!([{"name": "ab"}, {"name": "cd"}]), Some(&rules), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(node.to_json(), json!([{"name": "XX"}, {"name": "cd"}]));
    }

    #[test]
    fn test_map_deletion_keeps_sibling_order() {
        let rules = compile_rules(&[RuleSpec::new("^b$", "delete")]).unwrap();
        let node = walk(json!({"c": 1, "b": 2, "a": 3}), Some(&rules), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(
            serde_json::to_string(&node.to_json()).unwrap(),
            r#"{"c":1,"a":3}"#
        );
    }

    #[test]
    fn test_stats_count_new_aliases_separately() {
        let rules = compile_rules(&[RuleSpec::new(r"^names\.", "alias")]).unwrap();
        let mut node = Node::from(json!({"names": ["ann", "bob", "ann"]}));
        let mut keymap = Keymap::new();
        let replacements = Replacements::default();
        let mut stats = RedactionStats::default();
        TreeWalker {
            rules: Some(&rules),
            keymap: &mut keymap,
            replacements: &replacements,
            stats: &mut stats,
            max_depth: DEFAULT_MAX_DEPTH,
        }
        .walk_document(&mut node)
        .unwrap();
        assert_eq!(stats.aliased, 3);
        assert_eq!(stats.aliases_created, 2);
        assert_eq!(stats.masked, 0);
    }

    #[test]
    fn test_leaf_root_is_untouched() {
        let node = walk(json!("secret"), None, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(node, Node::from("secret"));
    }

    #[test]
    fn test_depth_limit_reports_path() {
        let err = walk(json!({"a": {"b": {"c": 1}}}), None, 2).unwrap_err();
        match err {
            RedactError::DepthExceeded { path, limit } => {
                assert_eq!(path, "a.b.c");
                assert_eq!(limit, 2);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
