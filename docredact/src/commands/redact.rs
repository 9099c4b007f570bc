//! Redact command: reads a JSON document stream, applies the rules, writes the result.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::{Number, Value};
use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use docredact_core::{
    merge_rules, PatternStyle, RedactionConfig, RedactionContext, RedactionStats, RuleSpec,
};

/// Options for [`run_redact`].
#[derive(Debug, Default)]
pub struct RedactOptions {
    pub input_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub rules: Vec<RuleSpec>,
    pub rule_style: PatternStyle,
    pub pretty: bool,
    pub numeric_replacement: Option<Number>,
    pub temporal_replacement: Option<DateTime<Utc>>,
}

/// Builds the context described by the options. With neither a config file
/// nor `--rule` flags the context masks every leaf.
pub fn build_context(opts: &RedactOptions) -> Result<RedactionContext> {
    let file_config = match &opts.config {
        Some(path) => Some(RedactionConfig::load_from_file(path)?),
        None => None,
    };
    let flag_config = if opts.rules.is_empty() {
        None
    } else {
        let config = RedactionConfig::from_specs(opts.rule_style, opts.rules.clone());
        config.validate().context("Invalid --rule flag")?;
        Some(config)
    };

    let mut context = match (file_config, flag_config) {
        (None, None) => {
            info!("No rules given; masking every leaf value.");
            RedactionContext::only_leaf()
        }
        (Some(base), overrides) => merge_rules(base, overrides)
            .context("--rule flags must use the config file's style; add or drop --dot-path to match")?
            .build_context()?,
        (None, Some(flags)) => flags.build_context()?,
    };

    if let Some(numeric) = &opts.numeric_replacement {
        context.set_numeric_replacement(numeric.clone());
    }
    if let Some(temporal) = opts.temporal_replacement {
        context.set_temporal_replacement(temporal);
    }
    Ok(context)
}

/// Redacts every JSON value read from `reader` and writes one per line (or
/// pretty-printed) to `writer`. Returns the number of documents written.
pub fn redact_stream<R: Read, W: Write>(
    context: &mut RedactionContext,
    reader: R,
    writer: &mut W,
    pretty: bool,
) -> Result<u64> {
    let mut count = 0;
    for (index, document) in serde_json::Deserializer::from_reader(reader)
        .into_iter::<Value>()
        .enumerate()
    {
        let mut document = document.with_context(|| format!("Failed to parse document #{}", index + 1))?;
        context
            .redact_json(&mut document)
            .with_context(|| format!("Failed to redact document #{}", index + 1))?;
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, &document)?;
        } else {
            serde_json::to_writer(&mut *writer, &document)?;
        }
        writeln!(writer)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// The main operation runner for the docredact CLI.
pub fn run_redact(opts: &RedactOptions) -> Result<RedactionStats> {
    info!("Starting docredact operation.");
    let mut context = build_context(opts)?;

    let reader: Box<dyn Read> = match &opts.input_file {
        Some(path) => Box::new(BufReader::new(
            fs::File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let documents = match &opts.output {
        Some(path) => {
            info!("Writing redacted documents to file: {}", path.display());
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            redact_stream(&mut context, reader, &mut BufWriter::new(file), opts.pretty)?
        }
        None => {
            let stdout = io::stdout();
            redact_stream(&mut context, reader, &mut stdout.lock(), opts.pretty)?
        }
    };

    debug!("Redacted {} documents.", documents);
    info!("docredact operation completed.");
    Ok(context.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_stream_shares_aliases_across_documents() -> Result<()> {
        let opts = RedactOptions {
            rules: vec![RuleSpec::new("^name$", "alias")],
            ..Default::default()
        };
        let mut context = build_context(&opts)?;
        let input = r#"{"name":"x"} {"name":"y"}
{"name":"x"}"#;
        let mut out = Vec::new();
        let count = redact_stream(&mut context, input.as_bytes(), &mut out, false)?;
        assert_eq!(count, 3);
        assert_eq!(
            String::from_utf8(out)?,
            "{\"name\":\"KEY0\"}\n{\"name\":\"KEY1\"}\n{\"name\":\"KEY0\"}\n"
        );
        Ok(())
    }

    #[test]
    fn test_no_rules_masks_everything() -> Result<()> {
        let mut context = build_context(&RedactOptions::default())?;
        assert!(context.is_only_leaf());
        let mut out = Vec::new();
        redact_stream(&mut context, r#"{"a":"abc","n":[1]}"#.as_bytes(), &mut out, false)?;
        assert_eq!(String::from_utf8(out)?, "{\"a\":\"XXX\",\"n\":[999]}\n");
        Ok(())
    }

    #[test]
    fn test_style_mismatch_with_config_suggests_dot_path() -> Result<()> {
        let mut config = tempfile::NamedTempFile::new()?;
        writeln!(config, "style: dot_path\nrules:\n  - nested.ssn: mask\n")?;
        let mut opts = RedactOptions {
            config: Some(config.path().to_path_buf()),
            rules: vec![RuleSpec::new("^age$", "mask")],
            ..Default::default()
        };
        let err = build_context(&opts).unwrap_err();
        assert!(format!("{:#}", err).contains("--dot-path"), "{:#}", err);

        opts.rules = vec![RuleSpec::new("age", "mask")];
        opts.rule_style = PatternStyle::DotPath;
        let mut context = build_context(&opts)?;
        let mut out = Vec::new();
        redact_stream(&mut context, r#"{"age":3,"nested":{"ssn":"12"}}"#.as_bytes(), &mut out, false)?;
        assert_eq!(String::from_utf8(out)?, "{\"age\":999,\"nested\":{\"ssn\":\"XX\"}}\n");
        Ok(())
    }

    #[test]
    fn test_malformed_input_names_the_document() {
        let mut context = RedactionContext::only_leaf();
        let mut out = Vec::new();
        let err = redact_stream(&mut context, r#"{"a":1} {"b":"#.as_bytes(), &mut out, false).unwrap_err();
        assert!(format!("{:#}", err).contains("document #2"));
    }
}
