//! Rule definitions and compilation.
//!
//! A rule pairs a path pattern with a substitution model. Authors write rules
//! in one of two styles:
//!
//! * **dot-path**: a literal field path such as `nestedDoc.ssn`, which matches
//!   exactly that path and nothing else.
//! * **pattern**: a regular expression matched anywhere inside the dot-path.
//!   Anchor it yourself (`^`, `$`) for exact or suffix matching.
//!
//! Both styles compile to the same [`compiler::CompiledRule`]; the dot-path
//! front-end only escapes and anchors the text before handing it over.

pub mod compiler;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Substitution policy applied to a matched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Remove the node from its parent.
    Delete,
    /// Strings become same-length filler, numbers the numeric replacement.
    MaskSameLength,
    /// Strings become a stable per-path alias (`KEY0`, `KEY1`, ...).
    StableAlias,
    /// Leave the value alone.
    NoOp,
    /// The rule named a model nobody recognizes. Behaves like `NoOp`.
    Unresolved,
}

impl ModelKind {
    /// Resolves an author-facing model name. Unknown names map to
    /// [`ModelKind::Unresolved`] rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "delete" | "del" => ModelKind::Delete,
            "mask" | "slx" => ModelKind::MaskSameLength,
            "alias" | "sub" => ModelKind::StableAlias,
            "noop" | "keep" => ModelKind::NoOp,
            _ => ModelKind::Unresolved,
        }
    }

    /// Whether this model changes anything at all.
    pub fn is_active(&self) -> bool {
        !matches!(self, ModelKind::NoOp | ModelKind::Unresolved)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelKind::Delete => "delete",
            ModelKind::MaskSameLength => "mask",
            ModelKind::StableAlias => "alias",
            ModelKind::NoOp => "noop",
            ModelKind::Unresolved => "unresolved",
        };
        write!(f, "{}", s)
    }
}

/// How a [`RuleSpec`]'s pattern text should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStyle {
    /// Literal dot-separated field path, matched exactly.
    DotPath,
    /// Regular expression, matched as a substring of the dot-path.
    #[default]
    Pattern,
}

/// An author-facing rule before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Field path or regular expression, depending on the style it is compiled with.
    pub pattern: String,
    /// Model name: `delete`, `mask`, `alias` or `noop` (and their short forms).
    pub model: String,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            model: model.into(),
        }
    }

    pub fn model_kind(&self) -> ModelKind {
        ModelKind::from_name(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names_and_short_forms() {
        assert_eq!(ModelKind::from_name("delete"), ModelKind::Delete);
        assert_eq!(ModelKind::from_name("del"), ModelKind::Delete);
        assert_eq!(ModelKind::from_name("mask"), ModelKind::MaskSameLength);
        assert_eq!(ModelKind::from_name("SLX"), ModelKind::MaskSameLength);
        assert_eq!(ModelKind::from_name("alias"), ModelKind::StableAlias);
        assert_eq!(ModelKind::from_name("sub"), ModelKind::StableAlias);
        assert_eq!(ModelKind::from_name("keep"), ModelKind::NoOp);
    }

    #[test]
    fn test_unknown_model_is_unresolved_and_inactive() {
        let kind = ModelKind::from_name("scramble");
        assert_eq!(kind, ModelKind::Unresolved);
        assert!(!kind.is_active());
        assert!(ModelKind::Delete.is_active());
    }
}
