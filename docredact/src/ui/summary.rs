//! Redaction summary printed after a run.
//!
//! Colors are applied only when the target stream is a terminal.

use docredact_core::RedactionStats;
use owo_colors::OwoColorize;
use std::io::{self, Write};

fn label<W: Write>(writer: &mut W, name: &str, count: u64, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "  {:<22} {}", name.cyan(), count.yellow())
    } else {
        writeln!(writer, "  {:<22} {}", name, count)
    }
}

/// Writes the per-run counters to `writer`.
pub fn print_summary<W: Write>(stats: &RedactionStats, writer: &mut W, supports_color: bool) -> io::Result<()> {
    let header = "--- Redaction Summary ---";
    if supports_color {
        writeln!(writer, "{}", header.bold())?;
    } else {
        writeln!(writer, "{}", header)?;
    }

    if stats.total_changes() == 0 {
        let message = format!("No changes in {} documents.", stats.documents);
        if supports_color {
            writeln!(writer, "  {}", message.green())?;
        } else {
            writeln!(writer, "  {}", message)?;
        }
        return Ok(());
    }

    label(writer, "documents", stats.documents, supports_color)?;
    label(writer, "masked", stats.masked, supports_color)?;
    label(writer, "aliased", stats.aliased, supports_color)?;
    label(writer, "new aliases", stats.aliases_created, supports_color)?;
    label(writer, "deleted", stats.deleted, supports_color)?;
    label(writer, "erased identifiers", stats.erased_identifiers, supports_color)?;
    Ok(())
}

/// Writes an error line, red when the stream supports color.
pub fn print_error<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "error:".red().bold(), message)
    } else {
        writeln!(writer, "error: {}", message)
    }
}
