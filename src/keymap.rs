//! Declarative key maps: static tables from dotted paths to output labels.

use serde_json::Value;

use crate::record::FieldMap;
use crate::tree::resolve_dotted;

/// An ordered table of `(dotted path, output label)` pairs.
///
/// Each entry resolves independently against a root node. Missing paths are
/// rendered as an empty string, so [`KeyMap::resolve`] is total.
///
/// When two entries share a label the slot keeps the position of the first
/// declaration, and takes the value of the last entry in declaration order
/// that resolved to something non-empty. If none did, the slot is empty.
#[derive(Debug, Clone, Copy)]
pub struct KeyMap {
    entries: &'static [(&'static str, &'static str)],
}

impl KeyMap {
    /// Wrap a static table.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// The raw table.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Distinct labels in output order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::with_capacity(self.entries.len());
        for &(_, label) in self.entries {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Resolve every entry against `root`.
    pub fn resolve(&self, root: &Value) -> FieldMap {
        let mut out = FieldMap::new();
        for (path, label) in self.entries {
            let value = resolve_dotted(root, path).or_empty_string();
            match out.get_mut(*label) {
                Some(slot) => {
                    if !is_blank(&value) {
                        *slot = value;
                    }
                }
                None => {
                    out.insert((*label).to_string(), value);
                }
            }
        }
        out
    }
}

/// A key map whose labels are the path strings themselves.
#[derive(Debug, Clone, Copy)]
pub struct PathList {
    paths: &'static [&'static str],
}

impl PathList {
    /// Wrap a static path list.
    pub const fn new(paths: &'static [&'static str]) -> Self {
        Self { paths }
    }

    /// The raw path list.
    pub fn paths(&self) -> &'static [&'static str] {
        self.paths
    }

    /// Resolve every path against `root`, labeling each by its path.
    pub fn resolve(&self, root: &Value) -> FieldMap {
        self.paths
            .iter()
            .map(|path| (path.to_string(), resolve_dotted(root, path).or_empty_string()))
            .collect()
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAP: KeyMap = KeyMap::new(&[
        ("a.name", "Name"),
        ("b", "Other"),
        ("c.name", "Name"),
    ]);

    #[test]
    fn test_missing_paths_render_empty() {
        let out = MAP.resolve(&json!({}));
        assert_eq!(out.len(), 2);
        assert_eq!(out["Name"], json!(""));
        assert_eq!(out["Other"], json!(""));
    }

    #[test]
    fn test_duplicate_label_keeps_first_position() {
        let out = MAP.resolve(&json!({"c": {"name": "late"}, "b": 1}));
        let labels: Vec<&String> = out.keys().collect();
        assert_eq!(labels, ["Name", "Other"]);
        assert_eq!(out["Name"], json!("late"));
    }

    #[test]
    fn test_duplicate_label_empty_later_entry_does_not_clobber() {
        let out = MAP.resolve(&json!({"a": {"name": "early"}}));
        assert_eq!(out["Name"], json!("early"));
    }

    #[test]
    fn test_duplicate_label_last_non_empty_wins() {
        let out = MAP.resolve(&json!({"a": {"name": "early"}, "c": {"name": "late"}}));
        assert_eq!(out["Name"], json!("late"));
    }

    #[test]
    fn test_labels_deduplicated() {
        assert_eq!(MAP.labels(), ["Name", "Other"]);
    }

    #[test]
    fn test_path_list_labels_are_paths() {
        const PATHS: PathList = PathList::new(&["x.y", "x"]);
        let out = PATHS.resolve(&json!({"x": {"y": true}}));
        assert_eq!(out["x.y"], json!(true));
        assert_eq!(out["x"], json!({"y": true}));
    }
}
