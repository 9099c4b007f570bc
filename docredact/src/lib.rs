// docredact/src/lib.rs
//! # docredact CLI
//!
//! Command-line front end for `docredact-core`. Reads a stream of JSON
//! documents, redacts them with one shared context, and reports a summary
//! of what changed on stderr.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::redact::{run_redact, RedactOptions};
