//! Configuration management for `docredact-core`.
//!
//! This module defines the YAML shape of a rule file and turns it into a
//! compiled [`RuleSet`] or a ready-to-use [`RedactionContext`]. Loading
//! validates every rule up front and reports all problems at once.
//!
//! ```yaml
//! style: pattern          # or dot_path
//! rules:
//!   - pattern: "\\.ssn$"
//!     model: mask
//!   - "^name$": alias     # shorthand form
//! replacements:
//!   temporal: "2001-01-01T00:00:00Z"
//!   numeric: 999
//! max_depth: 512
//! ```
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::path::Path;

use crate::context::RedactionContext;
use crate::errors::RedactError;
use crate::rules::compiler::{compile_with_style, RuleSet};
use crate::rules::{ModelKind, PatternStyle, RuleSpec};

/// A rule as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleEntry {
    /// `{ pattern: "...", model: "...", description: "..." }`
    Full {
        pattern: String,
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// `{ "<pattern>": "<model>" }`, exactly one entry.
    Shorthand(BTreeMap<String, String>),
}

impl RuleEntry {
    /// Converts to a [`RuleSpec`]; shorthand entries must have exactly one key.
    pub fn to_spec(&self) -> std::result::Result<RuleSpec, String> {
        match self {
            RuleEntry::Full { pattern, model, .. } => Ok(RuleSpec::new(pattern.as_str(), model.as_str())),
            RuleEntry::Shorthand(map) => {
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((pattern, model)), None) => Ok(RuleSpec::new(pattern.as_str(), model.as_str())),
                    (None, _) => Err("A shorthand rule is empty.".to_string()),
                    (Some(_), Some(_)) => Err(format!(
                        "A shorthand rule has {} entries; write one pattern per rule: {:?}",
                        map.len(),
                        map.keys().collect::<Vec<_>>()
                    )),
                }
            }
        }
    }
}

impl From<RuleSpec> for RuleEntry {
    fn from(spec: RuleSpec) -> Self {
        RuleEntry::Full {
            pattern: spec.pattern,
            model: spec.model,
            description: None,
        }
    }
}

/// Leaf replacement overrides.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReplacementConfig {
    pub temporal: Option<DateTime<Utc>>,
    pub numeric: Option<Number>,
}

/// Top-level rule file.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RedactionConfig {
    /// How every rule's pattern text is interpreted.
    pub style: PatternStyle,
    /// Rules in priority order.
    pub rules: Vec<RuleEntry>,
    pub replacements: ReplacementConfig,
    pub max_depth: Option<usize>,
}

impl RedactionConfig {
    /// Loads and validates a YAML rule file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading redaction rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses and validates YAML rule text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: RedactionConfig =
            serde_yml::from_str(text).context("Failed to parse redaction config")?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from specs already in memory.
    pub fn from_specs(style: PatternStyle, specs: Vec<RuleSpec>) -> Self {
        Self {
            style,
            rules: specs.into_iter().map(RuleEntry::from).collect(),
            ..Self::default()
        }
    }

    /// The rules as engine specs, in priority order.
    pub fn rule_specs(&self) -> Result<Vec<RuleSpec>> {
        self.rules
            .iter()
            .map(|entry| entry.to_spec().map_err(|e| anyhow!(e)))
            .collect()
    }

    /// Checks every rule and reports all problems together. Unlike the
    /// engine, which treats unknown model names as no-ops, the loader
    /// rejects them.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for (index, entry) in self.rules.iter().enumerate() {
            let spec = match entry.to_spec() {
                Ok(spec) => spec,
                Err(e) => {
                    errors.push(format!("Rule #{}: {}", index + 1, e));
                    continue;
                }
            };

            if spec.pattern.is_empty() {
                errors.push(format!("Rule #{} has an empty pattern.", index + 1));
                continue;
            }

            if spec.model_kind() == ModelKind::Unresolved {
                errors.push(format!(
                    "Rule #{} ('{}') names unknown model '{}'; expected delete, mask, alias or noop.",
                    index + 1,
                    spec.pattern,
                    spec.model
                ));
            }

            if let Err(e) = compile_with_style(std::slice::from_ref(&spec), self.style) {
                errors.push(format!("Rule #{}: {}", index + 1, e));
            }
        }

        if let Some(0) = self.max_depth {
            errors.push("`max_depth` must be at least 1.".to_string());
        }

        if errors.is_empty() {
            debug!("Validated {} rules.", self.rules.len());
            Ok(())
        } else {
            Err(RedactError::ConfigValidation(errors.join("\n")).into())
        }
    }

    /// Compiles the rules with the configured style.
    pub fn compile(&self) -> Result<RuleSet> {
        let specs = self.rule_specs()?;
        compile_with_style(&specs, self.style).context("Failed to compile redaction rules")
    }

    /// Compiles the rules and applies replacement and depth settings to a
    /// fresh context.
    pub fn build_context(&self) -> Result<RedactionContext> {
        let mut context = RedactionContext::new(Some(self.compile()?));
        self.apply_settings(&mut context);
        Ok(context)
    }

    /// Applies replacement and depth overrides to an existing context.
    pub fn apply_settings(&self, context: &mut RedactionContext) {
        if let Some(temporal) = self.replacements.temporal {
            debug!("Overriding temporal replacement with {}", temporal);
            context.set_temporal_replacement(temporal);
        }
        if let Some(numeric) = &self.replacements.numeric {
            debug!("Overriding numeric replacement with {}", numeric);
            context.set_numeric_replacement(numeric.clone());
        }
        if let Some(max_depth) = self.max_depth {
            context.set_max_depth(max_depth);
        }
    }
}

/// Merges an override config into a base config.
///
/// Override rules are placed ahead of the base rules so they win on
/// overlapping paths. Replacement and depth settings from the override
/// replace the base ones when set. Both configs must use the same style.
pub fn merge_rules(base: RedactionConfig, overrides: Option<RedactionConfig>) -> Result<RedactionConfig> {
    let Some(overrides) = overrides else {
        return Ok(base);
    };
    debug!(
        "Merging {} override rules ahead of {} base rules.",
        overrides.rules.len(),
        base.rules.len()
    );
    if !base.rules.is_empty() && !overrides.rules.is_empty() && base.style != overrides.style {
        return Err(anyhow!(
            "Cannot merge {:?} rules into a {:?} config.",
            overrides.style,
            base.style
        ));
    }

    let style = if overrides.rules.is_empty() { base.style } else { overrides.style };
    let mut rules = overrides.rules;
    rules.extend(base.rules);

    Ok(RedactionConfig {
        style,
        rules,
        replacements: ReplacementConfig {
            temporal: overrides.replacements.temporal.or(base.replacements.temporal),
            numeric: overrides.replacements.numeric.or(base.replacements.numeric),
        },
        max_depth: overrides.max_depth.or(base.max_depth),
    })
}
