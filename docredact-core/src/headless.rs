// File: docredact-core/src/headless.rs

//! `headless.rs`
//! One-shot convenience wrappers around [`RedactionContext`].
//!
//! Each call builds a throwaway context, redacts exactly one document and
//! drops the context, so stable aliases restart at `KEY0` on every call.

use crate::context::RedactionContext;
use crate::document::Node;
use crate::errors::Result;
use crate::rules::compiler::{compile_dot_path_rules, compile_rules};
use crate::rules::RuleSpec;

/// Redacts `document` with pattern-style rules. `None` masks every leaf.
pub fn redact_once<'d>(document: &'d mut Node, specs: Option<&[RuleSpec]>) -> Result<&'d mut Node> {
    let rules = specs.map(compile_rules).transpose()?;
    RedactionContext::new(rules).redact(document)
}

/// Redacts `document` with dot-path-style rules. `None` masks every leaf.
pub fn redact_once_dot_path<'d>(
    document: &'d mut Node,
    specs: Option<&[RuleSpec]>,
) -> Result<&'d mut Node> {
    let rules = specs.map(compile_dot_path_rules).transpose()?;
    RedactionContext::new(rules).redact(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_shot_alias_restarts_every_call() {
        let specs = [RuleSpec::new("^name$", "alias")];
        for value in ["x", "y"] {
            let mut doc = Node::from(json!({ "name": value }));
            redact_once(&mut doc, Some(&specs[..])).unwrap();
            assert_eq!(doc.to_json(), json!({"name": "KEY0"}));
        }
    }

    #[test]
    fn test_dot_path_one_shot() {
        let specs = [RuleSpec::new("nestedDoc.ssn", "delete")];
        let mut doc = Node::from(json!({"ssn": "1", "nestedDoc": {"ssn": "2", "hat": "fedora"}}));
        redact_once_dot_path(&mut doc, Some(&specs[..])).unwrap();
        assert_eq!(doc.to_json(), json!({"ssn": "1", "nestedDoc": {"hat": "fedora"}}));
    }

    #[test]
    fn test_one_shot_propagates_compile_errors() {
        let specs = [RuleSpec::new("(", "mask")];
        let mut doc = Node::from(json!({"a": "b"}));
        assert!(redact_once(&mut doc, Some(&specs[..])).is_err());
        assert_eq!(doc.to_json(), json!({"a": "b"}));
    }
}
