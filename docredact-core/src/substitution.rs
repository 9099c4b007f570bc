//! Leaf substitution policies.
//!
//! Given a resolved model and a leaf value, decide whether the value is kept,
//! replaced, or removed from its parent. Containers never reach this module;
//! the walker handles them.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Number;

use crate::document::Node;
use crate::keymap::Keymap;
use crate::rules::ModelKind;

/// Character used to build same-length masks.
pub const MASK_FILLER: char = 'X';

/// Default numeric mask.
pub const DEFAULT_NUMERIC_REPLACEMENT: i64 = 999;

/// Default temporal mask: 2001-01-01T00:00:00Z.
pub fn default_temporal_replacement() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Replacement values for leaves that cannot be masked by shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacements {
    pub temporal: DateTime<Utc>,
    pub numeric: Number,
}

impl Default for Replacements {
    fn default() -> Self {
        Self {
            temporal: default_temporal_replacement(),
            numeric: Number::from(DEFAULT_NUMERIC_REPLACEMENT),
        }
    }
}

/// What the parent container should do with a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    Keep,
    Replace(Node),
    /// A stable alias; `created` is true the first time the value was seen at
    /// this path.
    Alias { alias: String, created: bool },
    Remove,
}

/// Builds a string of `MASK_FILLER` with the same character count as `value`.
pub fn mask_same_length(value: &str) -> String {
    std::iter::repeat(MASK_FILLER)
        .take(value.chars().count())
        .collect()
}

/// Applies `model` to `leaf` found at `path`.
pub fn substitute(
    model: ModelKind,
    leaf: &Node,
    path: &str,
    keymap: &mut Keymap,
    replacements: &Replacements,
) -> Substitution {
    if model == ModelKind::Delete {
        return Substitution::Remove;
    }

    match leaf {
        Node::Temporal { .. } => Substitution::Replace(Node::temporal(replacements.temporal)),
        Node::String(s) => match model {
            ModelKind::MaskSameLength => Substitution::Replace(Node::String(mask_same_length(s))),
            ModelKind::StableAlias => {
                let (alias, created) = keymap.alias_for(path, s);
                Substitution::Alias { alias, created }
            }
            _ => Substitution::Keep,
        },
        Node::Number(_) => match model {
            ModelKind::MaskSameLength => {
                Substitution::Replace(Node::Number(replacements.numeric.clone()))
            }
            _ => Substitution::Keep,
        },
        Node::Bool(_)
        | Node::Null
        | Node::OpaqueIdentifier(_)
        | Node::Map(_)
        | Node::Sequence(_) => Substitution::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(model: ModelKind, leaf: Node) -> Substitution {
        substitute(model, &leaf, "p", &mut Keymap::new(), &Replacements::default())
    }

    #[test]
    fn test_mask_preserves_character_length() {
        for s in ["", "a", "111-22-3333", "héllo wörld", "z".repeat(200).as_str()] {
            let masked = mask_same_length(s);
            assert_eq!(masked.chars().count(), s.chars().count());
            assert!(masked.chars().all(|c| c == MASK_FILLER));
        }
    }

    #[test]
    fn test_mask_number_uses_replacement() {
        assert_eq!(
            apply(ModelKind::MaskSameLength, Node::Number(Number::from(123456))),
            Substitution::Replace(Node::Number(Number::from(999)))
        );
    }

    #[test]
    fn test_delete_removes_any_leaf() {
        assert_eq!(apply(ModelKind::Delete, Node::from("x")), Substitution::Remove);
        assert_eq!(apply(ModelKind::Delete, Node::Bool(true)), Substitution::Remove);
        assert_eq!(apply(ModelKind::Delete, Node::Null), Substitution::Remove);
    }

    #[test]
    fn test_alias_leaves_numbers_alone() {
        assert_eq!(
            apply(ModelKind::StableAlias, Node::Number(Number::from(12))),
            Substitution::Keep
        );
    }

    #[test]
    fn test_noop_and_unresolved_keep_values() {
        assert_eq!(apply(ModelKind::NoOp, Node::from("x")), Substitution::Keep);
        assert_eq!(apply(ModelKind::Unresolved, Node::from("x")), Substitution::Keep);
    }

    #[test]
    fn test_temporal_always_uses_replacement() {
        let ts = Utc.with_ymd_and_hms(2014, 5, 4, 0, 0, 0).unwrap();
        for model in [ModelKind::MaskSameLength, ModelKind::StableAlias, ModelKind::NoOp] {
            assert_eq!(
                apply(model, Node::temporal(ts)),
                Substitution::Replace(Node::temporal(default_temporal_replacement()))
            );
        }
    }

    #[test]
    fn test_alias_reports_first_sighting() {
        let mut keymap = Keymap::new();
        let replacements = Replacements::default();
        let mut run = |value: &str| {
            substitute(ModelKind::StableAlias, &Node::from(value), "name", &mut keymap, &replacements)
        };
        assert_eq!(run("buzz"), Substitution::Alias { alias: "KEY0".to_string(), created: true });
        assert_eq!(run("buzz"), Substitution::Alias { alias: "KEY0".to_string(), created: false });
        assert_eq!(run("dog"), Substitution::Alias { alias: "KEY1".to_string(), created: true });
    }

    #[test]
    fn test_bool_survives_masking() {
        assert_eq!(apply(ModelKind::MaskSameLength, Node::Bool(false)), Substitution::Keep);
    }
}
