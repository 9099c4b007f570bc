//! PII-safe debug logging for redaction events.
//!
//! Original values are only written to the log when
//! `DOCREDACT_ALLOW_DEBUG_PII=true` is set in the environment; otherwise they
//! are replaced by a length-only placeholder.

use lazy_static::lazy_static;
use log::{debug, log_enabled, Level};

use crate::document::Node;
use crate::rules::ModelKind;

lazy_static! {
    /// Read once: whether PII may appear in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("DOCREDACT_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.chars().count() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.chars().count())
    }
}

fn loggable(node: &Node) -> String {
    match node {
        Node::String(s) if *PII_DEBUG_ALLOWED => format!("{:?}", s),
        Node::String(s) => redact_sensitive(s),
        Node::Number(n) if *PII_DEBUG_ALLOWED => n.to_string(),
        Node::Temporal { at, .. } if *PII_DEBUG_ALLOWED => at.to_rfc3339(),
        Node::OpaqueIdentifier(id) if *PII_DEBUG_ALLOWED => id.clone(),
        other => format!("<{}>", other.kind()),
    }
}

/// Logs a leaf that was replaced.
pub fn log_substitution_debug(path: &str, model: ModelKind, original: &Node, replacement: &Node) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    debug!(
        "Redacted '{}' with {}: original={}, replacement={}",
        path,
        model,
        loggable(original),
        loggable(replacement)
    );
}

/// Logs a node that was removed from its parent.
pub fn log_removal_debug(path: &str, node: &Node) {
    debug!("Removed '{}' ({})", path, node.kind());
}
