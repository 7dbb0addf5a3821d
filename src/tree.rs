//! Key-path traversal over parsed JSON documents.
//!
//! Descriptor files are deeply nested and frequently incomplete. Every lookup
//! goes through [`resolve_path`], which walks a sequence of property names and
//! reports [`Resolved::Absent`] instead of failing when a step is missing or
//! lands on something that is not a mapping.

use serde_json::Value;

/// Outcome of walking a key path through a document tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// Every segment was present; holds the final node.
    Found(&'a Value),
    /// Some segment was missing, or an intermediate node was not a mapping.
    Absent,
}

impl<'a> Resolved<'a> {
    /// The resolved node, if any.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolved::Found(v) => Some(v),
            Resolved::Absent => None,
        }
    }

    /// Returns true if the path did not resolve.
    pub fn is_absent(self) -> bool {
        matches!(self, Resolved::Absent)
    }

    /// Clone of the node, or JSON `null` when absent.
    pub fn or_null(self) -> Value {
        self.value().cloned().unwrap_or(Value::Null)
    }

    /// Clone of the node, or an empty string when the node is absent or
    /// falsy: `null`, `false`, zero, or an empty string, list or mapping.
    pub fn or_empty_string(self) -> Value {
        match self.value() {
            Some(v) if !is_falsy(v) => v.clone(),
            _ => Value::String(String::new()),
        }
    }
}

/// Returns true for the values a key map renders as an empty string.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Walk `segments` from `root`, one mapping lookup per segment.
///
/// An empty segment list resolves to `root` itself.
pub fn resolve_path<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Resolved<'a> {
    let mut node = root;
    for segment in segments {
        match node.as_object().and_then(|m| m.get(segment.as_ref())) {
            Some(next) => node = next,
            None => return Resolved::Absent,
        }
    }
    Resolved::Found(node)
}

/// Walk a dotted path expression such as `"objective.name"`.
pub fn resolve_dotted<'a>(root: &'a Value, path: &str) -> Resolved<'a> {
    let segments: Vec<&str> = path.split('.').collect();
    resolve_path(root, &segments)
}
