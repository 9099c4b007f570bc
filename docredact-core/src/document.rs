//! The document tree the engine walks.
//!
//! A [`Node`] is a closed tagged union over every value kind the engine knows
//! about. Host-specific leaf types (points in time, database-generated
//! identifiers) get their own variants so the walker can dispatch on them with
//! an exhaustive `match` instead of runtime type probing.
//!
//! Conversion to and from `serde_json::Value` follows the extended-JSON
//! convention: a single-key object `{"$date": ...}` becomes [`Node::Temporal`]
//! and `{"$oid": "..."}` becomes [`Node::OpaqueIdentifier`]. Map entries keep
//! their document order, and a temporal that the engine leaves alone is
//! written back with its original `$date` payload.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Number, Value};
use indexmap::IndexMap;

/// Extended-JSON key marking a temporal leaf.
pub const DATE_KEY: &str = "$date";
/// Extended-JSON key marking an opaque identifier leaf.
pub const OID_KEY: &str = "$oid";

/// A single node of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Map(IndexMap<String, Node>),
    Sequence(Vec<Node>),
    String(String),
    Number(Number),
    Bool(bool),
    /// A point in time. `raw` holds the `$date` payload it was read from and
    /// is `None` for values the engine produced.
    Temporal { at: DateTime<Utc>, raw: Option<Value> },
    /// A host-generated identifier. The engine always erases these.
    OpaqueIdentifier(String),
    Null,
}

impl Node {
    /// A temporal leaf with no source encoding.
    pub fn temporal(at: DateTime<Utc>) -> Self {
        Node::Temporal { at, raw: None }
    }

    /// Returns true for `Map` and `Sequence`.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Map(_) | Node::Sequence(_))
    }

    /// Looks up a child by key (maps) or index (sequences).
    pub fn get(&self, segment: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(segment),
            Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Follows a dot-path from this node, e.g. `nestedArray.1.ssn`.
    pub fn pointer(&self, dot_path: &str) -> Option<&Node> {
        if dot_path.is_empty() {
            return Some(self);
        }
        dot_path
            .split('.')
            .try_fold(self, |node, segment| node.get(segment))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in log lines so values never leak.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Map(_) => "map",
            Node::Sequence(_) => "sequence",
            Node::String(_) => "string",
            Node::Number(_) => "number",
            Node::Bool(_) => "bool",
            Node::Temporal { .. } => "temporal",
            Node::OpaqueIdentifier(_) => "opaque_identifier",
            Node::Null => "null",
        }
    }

    /// Converts this tree back into plain JSON, re-encoding host types in
    /// extended-JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            Node::Sequence(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            Node::String(s) => Value::String(s.clone()),
            Node::Number(n) => Value::Number(n.clone()),
            Node::Bool(b) => Value::Bool(*b),
            Node::Temporal { at, raw } => {
                let payload = raw
                    .clone()
                    .unwrap_or_else(|| Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)));
                let mut map = Map::new();
                map.insert(DATE_KEY.to_string(), payload);
                Value::Object(map)
            }
            Node::OpaqueIdentifier(id) => {
                let mut map = Map::new();
                map.insert(OID_KEY.to_string(), Value::String(id.clone()));
                Value::Object(map)
            }
            Node::Null => Value::Null,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                if let Some(leaf) = extended_leaf(&map) {
                    return leaf;
                }
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        node.to_json()
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<DateTime<Utc>> for Node {
    fn from(ts: DateTime<Utc>) -> Self {
        Node::temporal(ts)
    }
}

/// Recognizes `{"$date": ...}` and `{"$oid": "..."}`. Objects that only look
/// similar (extra keys, unparsable dates) stay ordinary maps.
fn extended_leaf(map: &Map<String, Value>) -> Option<Node> {
    if map.len() != 1 {
        return None;
    }
    let (key, value) = map.iter().next()?;
    match (key.as_str(), value) {
        (DATE_KEY, Value::String(s)) => DateTime::parse_from_rfc3339(s).ok().map(|ts| Node::Temporal {
            at: ts.with_timezone(&Utc),
            raw: Some(value.clone()),
        }),
        (DATE_KEY, Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(|at| Node::Temporal {
                at,
                raw: Some(value.clone()),
            }),
        (OID_KEY, Value::String(s)) => Some(Node::OpaqueIdentifier(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extended_json_leaves_are_recognized() {
        let node = Node::from(json!({
            "created": {"$date": "2011-03-02T00:00:00Z"},
            "_id": {"$oid": "5f1d7c2e9b1e8a3d4c6f0a11"},
            "millis": {"$date": 0}
        }));
        assert!(matches!(node.get("created"), Some(Node::Temporal { .. })));
        assert!(matches!(node.get("millis"), Some(Node::Temporal { .. })));
        assert_eq!(
            node.get("_id"),
            Some(&Node::OpaqueIdentifier("5f1d7c2e9b1e8a3d4c6f0a11".to_string()))
        );
    }

    #[test]
    fn test_lookalike_objects_stay_maps() {
        let node = Node::from(json!({
            "a": {"$date": "not a date"},
            "b": {"$oid": "x", "extra": 1}
        }));
        assert!(matches!(node.get("a"), Some(Node::Map(_))));
        assert!(matches!(node.get("b"), Some(Node::Map(_))));
    }

    #[test]
    fn test_temporal_serializes_as_extended_json() {
        let ts = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Node::temporal(ts).to_json(),
            json!({"$date": "2001-01-01T00:00:00.000Z"})
        );
    }

    #[test]
    fn test_untouched_temporal_keeps_source_encoding() {
        let source = json!({
            "micros": {"$date": "2011-03-02T00:00:00.123456Z"},
            "millis": {"$date": 1299024000000i64}
        });
        assert_eq!(Node::from(source.clone()).to_json(), source);
    }

    #[test]
    fn test_map_keeps_document_order() {
        let node = Node::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let Node::Map(map) = &node else {
            panic!("expected a map");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&node.to_json()).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":3}"#
        );
    }

    #[test]
    fn test_pointer_walks_maps_and_sequences() {
        let node = Node::from(json!({"nestedArray": ["hat", {"ssn": "111"}]}));
        assert_eq!(
            node.pointer("nestedArray.1.ssn").and_then(Node::as_str),
            Some("111")
        );
        assert!(node.pointer("nestedArray.7").is_none());
    }
}
