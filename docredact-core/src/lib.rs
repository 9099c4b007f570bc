// docredact-core/src/lib.rs
//! # docredact Core Library
//!
//! `docredact-core` redacts and pseudonymizes values inside nested documents
//! (maps, sequences and scalars) according to an ordered list of path rules.
//! It is meant for sanitizing sample data before it leaves the building:
//! strip personal values, mask strings while keeping their shape, or swap
//! repeated values for stable per-field aliases across a stream of documents.
//!
//! ## Modules
//!
//! * `document`: The [`Node`] tree and its extended-JSON conversions.
//! * `rules`: Rule specs, model names and the rule compiler.
//! * `walker`: Depth-first traversal, dot-path computation and propagation.
//! * `substitution`: Per-type leaf policies (delete, mask, alias).
//! * `keymap`: The per-path alias table.
//! * `context`: [`RedactionContext`], the state that persists across documents.
//! * `config`: YAML rule files and their validation.
//! * `headless`: One-shot helpers that use a throwaway context.
//! * `redaction_log`: PII-safe debug logging.
//! * `stats`: Counters of what a context has done.
//!
//! ## Usage Example
//!
//! ```rust
//! use docredact_core::{compile_rules, RedactionContext, RuleSpec};
//! use serde_json::json;
//!
//! fn main() -> Result<(), docredact_core::RedactError> {
//!     let rules = compile_rules(&[
//!         RuleSpec::new("\\.?ssn$", "mask"),
//!         RuleSpec::new("^name$", "alias"),
//!     ])?;
//!     let mut ctx = RedactionContext::new(Some(rules));
//!
//!     let mut doc = json!({"name": "buzz", "ssn": "111-22-3333", "meta": {"ssn": "000-00-0000"}});
//!     ctx.redact_json(&mut doc)?;
//!     assert_eq!(doc, json!({"name": "KEY0", "ssn": "XXXXXXXXXXX", "meta": {"ssn": "XXXXXXXXXXX"}}));
//!
//!     // Aliases persist for the lifetime of the context.
//!     let mut next = json!({"name": "buzz"});
//!     ctx.redact_json(&mut next)?;
//!     assert_eq!(next, json!({"name": "KEY0"}));
//!     Ok(())
//! }
//! ```
//!
//! ## Rule semantics
//!
//! * Rules are tried in order against each node's dot-path; the first match wins.
//! * A matching container with `delete` is removed. Any other model is handed
//!   down to every descendant, overriding their own matches.
//! * With no rules at all ([`RedactionContext::only_leaf`]) every leaf is masked.
//! * Opaque identifiers are always erased to `null`.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod context;
pub mod document;
pub mod errors;
pub mod headless;
pub mod keymap;
pub mod redaction_log;
pub mod rules;
pub mod stats;
pub mod substitution;
pub mod walker;

/// Re-exports the configuration types for rule files.
pub use config::{merge_rules, RedactionConfig, ReplacementConfig, RuleEntry};

/// Re-exports the stateful context.
pub use context::RedactionContext;

/// Re-exports the document tree.
pub use document::Node;

/// Re-exports the custom error type.
pub use errors::{RedactError, Result};

/// Re-exports the one-shot helpers.
pub use headless::{redact_once, redact_once_dot_path};

pub use keymap::Keymap;

/// Re-exports rule specs and the compiler entry points.
pub use rules::compiler::{
    compile_dot_path_rules, compile_rules, compile_with_style, CompiledRule, RuleSet,
    MAX_PATTERN_LENGTH,
};
pub use rules::{ModelKind, PatternStyle, RuleSpec};

pub use stats::RedactionStats;
pub use substitution::{mask_same_length, Replacements, MASK_FILLER};
