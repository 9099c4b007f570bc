// docredact/src/cli.rs
//! This file defines the command-line interface (CLI) for the docredact
//! application.
//! License: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use clap::Parser;
use docredact_core::{ModelKind, PatternStyle, RuleSpec};
use serde_json::Number;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "docredact",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact and pseudonymize JSON documents with ordered path rules",
    long_about = "docredact reads a stream of JSON documents, applies an ordered list of path rules to every field, and writes the redacted documents back out. Rules can delete a field, mask it while keeping its length, or replace it with a stable alias that stays the same for repeated values across the whole stream. Without any rules every leaf value is masked."
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read documents from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write redacted output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Path to a YAML rule file.
    #[arg(long = "config", short = 'c', value_name = "FILE", help = "Path to a YAML redaction rule file.")]
    pub config: Option<PathBuf>,

    /// Extra rules, tried before any rules from the config file.
    #[arg(
        long = "rule",
        short = 'r',
        value_name = "PATTERN=MODEL",
        value_parser = parse_rule_arg,
        help = "Add a rule, e.g. '\\.ssn$=mask'. Models: delete, mask, alias, noop. Repeatable."
    )]
    pub rules: Vec<RuleSpec>,

    /// Interpret `--rule` patterns as literal dot-paths.
    #[arg(long = "dot-path", help = "Treat --rule patterns as exact dot-separated field paths.")]
    pub dot_path: bool,

    /// Pretty-print each output document.
    #[arg(long, help = "Pretty-print each output document instead of one per line.")]
    pub pretty: bool,

    #[arg(
        long = "numeric-replacement",
        value_name = "NUMBER",
        allow_hyphen_values = true,
        help = "Value that masked numbers are replaced with (default 999)."
    )]
    pub numeric_replacement: Option<Number>,

    #[arg(
        long = "temporal-replacement",
        value_name = "RFC3339",
        help = "Timestamp that masked dates are replaced with (default 2001-01-01T00:00:00Z)."
    )]
    pub temporal_replacement: Option<DateTime<Utc>>,

    /// Suppress the redaction summary.
    #[arg(long = "no-redaction-summary", help = "Suppress the redaction summary.")]
    pub no_summary: bool,
}

impl Cli {
    /// Authoring style for the `--rule` flags.
    pub fn rule_style(&self) -> PatternStyle {
        if self.dot_path {
            PatternStyle::DotPath
        } else {
            PatternStyle::Pattern
        }
    }
}

/// Parses `PATTERN=MODEL`. The split is on the last `=`, so patterns may
/// contain `=` themselves.
pub fn parse_rule_arg(arg: &str) -> Result<RuleSpec, String> {
    let (pattern, model) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATTERN=MODEL, got '{}'", arg))?;
    if pattern.is_empty() {
        return Err(format!("rule '{}' has an empty pattern", arg));
    }
    let spec = RuleSpec::new(pattern, model);
    if spec.model_kind() == ModelKind::Unresolved {
        return Err(format!(
            "unknown model '{}'; expected delete, mask, alias or noop",
            model
        ));
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_arg_splits_on_last_equals() {
        let spec = parse_rule_arg("^a=b$=mask").unwrap();
        assert_eq!(spec.pattern, "^a=b$");
        assert_eq!(spec.model, "mask");
    }

    #[test]
    fn test_parse_rule_arg_rejects_bad_input() {
        assert!(parse_rule_arg("no-model").is_err());
        assert!(parse_rule_arg("=mask").is_err());
        assert!(parse_rule_arg("^a$=scramble").is_err());
    }

    #[test]
    fn test_cli_parses_negative_numeric_replacement() {
        let cli = Cli::try_parse_from(["docredact", "--numeric-replacement", "-1", "-r", "^age$=mask"]).unwrap();
        assert_eq!(cli.numeric_replacement, Some(Number::from(-1)));
        assert_eq!(cli.rules.len(), 1);
        assert_eq!(cli.rule_style(), PatternStyle::Pattern);
    }
}
