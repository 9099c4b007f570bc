// docredact/src/main.rs
//! docredact entry point.
//!
//! Parses flags, initializes logging, runs the redaction over the input
//! stream and prints the summary to stderr.

use clap::Parser;
use is_terminal::IsTerminal;
use std::io;
use std::process::ExitCode;

use docredact::cli::Cli;
use docredact::logger;
use docredact::ui::summary;
use docredact::{run_redact, RedactOptions};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    let show_summary = !(cli.quiet || cli.no_summary);
    let opts = RedactOptions {
        rule_style: cli.rule_style(),
        input_file: cli.input_file,
        output: cli.output,
        config: cli.config,
        rules: cli.rules,
        pretty: cli.pretty,
        numeric_replacement: cli.numeric_replacement,
        temporal_replacement: cli.temporal_replacement,
    };

    let stderr_supports_color = io::stderr().is_terminal();
    match run_redact(&opts) {
        Ok(stats) => {
            if show_summary {
                let _ = summary::print_summary(&stats, &mut io::stderr(), stderr_supports_color);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = summary::print_error(&mut io::stderr(), &format!("{:#}", e), stderr_supports_color);
            ExitCode::FAILURE
        }
    }
}
