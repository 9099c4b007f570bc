//! compiler.rs - Compiles rule specs into an ordered, matchable [`RuleSet`].
//!
//! Compilation is all-or-nothing: every failing pattern is collected and the
//! call returns a single error naming them all. A `RuleSet` is immutable once
//! built and can be shared across contexts and threads behind an `Arc`.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::errors::{RedactError, Result};
use crate::rules::{ModelKind, PatternStyle, RuleSpec};

/// Maximum allowed length for a path pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled path predicate.
    pub regex: Regex,
    /// Resolved substitution model.
    pub model: ModelKind,
    /// Pattern text as the author wrote it, before escaping.
    pub source: String,
}

/// Ordered list of compiled rules. Position defines priority.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Index of the first rule whose pattern matches `path`.
    pub fn find_match(&self, path: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.regex.is_match(path))
    }

    /// Model of the rule at `index`; out of range resolves to `Unresolved`.
    pub fn model_at(&self, index: usize) -> ModelKind {
        self.rules
            .get(index)
            .map_or(ModelKind::Unresolved, |rule| rule.model)
    }

    pub fn get(&self, index: usize) -> Option<&CompiledRule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }
}

/// Turns a literal dot-path into an anchored regular expression:
/// `foo.bar.baz` becomes `^foo\.bar\.baz$`.
pub fn dot_path_to_pattern(field_path: &str) -> String {
    format!("^{}$", regex::escape(field_path))
}

/// Compiles pattern-style specs (unanchored regular expressions).
pub fn compile_rules(specs: &[RuleSpec]) -> Result<RuleSet> {
    compile_with_style(specs, PatternStyle::Pattern)
}

/// Compiles dot-path-style specs (literal field paths, matched exactly).
pub fn compile_dot_path_rules(specs: &[RuleSpec]) -> Result<RuleSet> {
    compile_with_style(specs, PatternStyle::DotPath)
}

/// Compiles specs in order using the given authoring style.
pub fn compile_with_style(specs: &[RuleSpec], style: PatternStyle) -> Result<RuleSet> {
    debug!("Starting compilation of {} {:?} rules.", specs.len(), style);

    let mut compiled_rules = Vec::with_capacity(specs.len());
    let mut compilation_errors = Vec::new();

    for spec in specs {
        let pattern = match style {
            PatternStyle::DotPath => dot_path_to_pattern(&spec.pattern),
            PatternStyle::Pattern => spec.pattern.clone(),
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(RedactError::PatternLengthExceeded(
                spec.pattern.clone(),
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let model = spec.model_kind();
        if model == ModelKind::Unresolved {
            warn!(
                "Rule '{}' names unknown model '{}'; it will match but never change anything.",
                spec.pattern, spec.model
            );
        }

        match RegexBuilder::new(&pattern)
            .size_limit(10 * (1 << 20))
            .build()
        {
            Ok(regex) => {
                debug!("Rule '{}' compiled as /{}/ -> {}.", spec.pattern, pattern, model);
                compiled_rules.push(CompiledRule {
                    regex,
                    model,
                    source: spec.pattern.clone(),
                });
            }
            Err(e) => {
                compilation_errors.push(RedactError::RuleCompilationError(spec.pattern.clone(), e));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(RedactError::CompilationFailed(compilation_errors.len(), error_message));
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
    Ok(RuleSet { rules: compiled_rules })
}
