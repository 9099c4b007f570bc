//! Cumulative counters of what a context has done.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionStats {
    /// Documents passed to `redact`.
    pub documents: u64,
    /// Leaves replaced by a mask (strings, numbers, temporals).
    pub masked: u64,
    /// Strings replaced by an alias.
    pub aliased: u64,
    /// Distinct aliases handed out for the first time.
    pub aliases_created: u64,
    /// Map entries and sequence elements removed, containers included.
    pub deleted: u64,
    /// Opaque identifiers erased.
    pub erased_identifiers: u64,
}

impl RedactionStats {
    /// Total number of nodes that were changed or removed.
    pub fn total_changes(&self) -> u64 {
        self.masked + self.aliased + self.deleted + self.erased_identifiers
    }
}
