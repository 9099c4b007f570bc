//! Stateful redaction context.
//!
//! A [`RedactionContext`] owns everything that must survive between
//! documents: the alias table and its counter, the replacement values and
//! the running statistics. The compiled rules are shared read-only through an
//! `Arc`, so one `RuleSet` can back many contexts.
//!
//! `redact` takes `&mut self`. To use one context from several threads, wrap
//! it in a `Mutex`; for independent aliasing, give each worker its own.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, Utc};
use log::debug;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::document::Node;
use crate::errors::Result;
use crate::keymap::Keymap;
use crate::rules::compiler::RuleSet;
use crate::stats::RedactionStats;
use crate::substitution::Replacements;
use crate::walker::{TreeWalker, DEFAULT_MAX_DEPTH};

#[derive(Debug, Clone)]
pub struct RedactionContext {
    rules: Option<Arc<RuleSet>>,
    keymap: Keymap,
    replacements: Replacements,
    stats: RedactionStats,
    max_depth: usize,
}

impl RedactionContext {
    /// Creates a context. `None` selects only-leaf mode, where every leaf
    /// is masked regardless of its path.
    pub fn new(rules: Option<RuleSet>) -> Self {
        Self::from_shared(rules.map(Arc::new))
    }

    /// Creates a context backed by a shared rule set.
    pub fn with_rules(rules: Arc<RuleSet>) -> Self {
        Self::from_shared(Some(rules))
    }

    /// Creates a context that masks every leaf.
    pub fn only_leaf() -> Self {
        Self::from_shared(None)
    }

    fn from_shared(rules: Option<Arc<RuleSet>>) -> Self {
        match &rules {
            Some(r) => debug!("Creating redaction context with {} rules.", r.len()),
            None => debug!("Creating redaction context in only-leaf mode."),
        }
        Self {
            rules,
            keymap: Keymap::new(),
            replacements: Replacements::default(),
            stats: RedactionStats::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Redacts `document` in place and hands the same reference back.
    pub fn redact<'d>(&mut self, document: &'d mut Node) -> Result<&'d mut Node> {
        let mut walker = TreeWalker {
            rules: self.rules.as_deref(),
            keymap: &mut self.keymap,
            replacements: &self.replacements,
            stats: &mut self.stats,
            max_depth: self.max_depth,
        };
        walker.walk_document(document)?;
        self.stats.documents += 1;
        debug!(
            "Redacted document #{} ({} aliases so far).",
            self.stats.documents,
            self.keymap.count()
        );
        Ok(document)
    }

    /// Redacts a plain JSON value, reading and writing host types in
    /// extended-JSON form.
    pub fn redact_json(&mut self, value: &mut Value) -> Result<()> {
        let mut node = Node::from(std::mem::take(value));
        let result = self.redact(&mut node).map(|_| ());
        *value = node.to_json();
        result
    }

    pub fn set_temporal_replacement(&mut self, value: DateTime<Utc>) {
        self.replacements.temporal = value;
    }

    pub fn set_numeric_replacement(&mut self, value: impl Into<Number>) {
        self.replacements.numeric = value.into();
    }

    /// Sets the deepest nesting level a document may have.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    pub fn replacements(&self) -> &Replacements {
        &self.replacements
    }

    pub fn is_only_leaf(&self) -> bool {
        self.rules.is_none()
    }

    pub fn rules(&self) -> Option<&Arc<RuleSet>> {
        self.rules.as_ref()
    }

    /// Number of aliases handed out over the context's lifetime.
    pub fn alias_count(&self) -> u64 {
        self.keymap.count()
    }

    /// Original value → alias table recorded for `path`.
    pub fn aliases_for(&self, path: &str) -> Option<&HashMap<String, String>> {
        self.keymap.aliases_for(path)
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn stats(&self) -> RedactionStats {
        self.stats
    }
}

impl Default for RedactionContext {
    fn default() -> Self {
        Self::only_leaf()
    }
}
