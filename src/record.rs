//! Display-ready output of the descriptor extractors.
//!
//! A [`CategorizedRecord`] is an ordered list of named categories. The order
//! is fixed by the extractor that built it and is preserved through
//! serialization, so a JSON dump lists categories exactly as they are shown.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Ordered mapping from field label to value.
///
/// `serde_json` is built with `preserve_order`, so insertion order is kept.
pub type FieldMap = Map<String, Value>;

/// The body of one category.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Labeled fields.
    Fields(FieldMap),
    /// One field mapping per repeated sub-entity, in input order.
    Entries(Vec<FieldMap>),
    /// A bare value.
    Scalar(Value),
}

impl Section {
    /// Fields of a [`Section::Fields`] section.
    pub fn as_fields(&self) -> Option<&FieldMap> {
        match self {
            Section::Fields(f) => Some(f),
            _ => None,
        }
    }

    /// Entries of a [`Section::Entries`] section.
    pub fn as_entries(&self) -> Option<&[FieldMap]> {
        match self {
            Section::Entries(e) => Some(e),
            _ => None,
        }
    }

    /// Convert to a plain JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Section::Fields(f) => Value::Object(f.clone()),
            Section::Entries(e) => Value::Array(e.iter().cloned().map(Value::Object).collect()),
            Section::Scalar(v) => v.clone(),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Section::Fields(f) => f.serialize(serializer),
            Section::Entries(e) => e.serialize(serializer),
            Section::Scalar(v) => v.serialize(serializer),
        }
    }
}

/// A named category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Category name as displayed.
    pub name: String,
    /// Category body.
    pub section: Section,
}

/// Ordered, categorized extraction result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedRecord {
    categories: Vec<Category>,
}

impl CategorizedRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category. Names are expected to be unique per record.
    pub fn push(&mut self, name: impl Into<String>, section: Section) {
        self.categories.push(Category {
            name: name.into(),
            section,
        });
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.section)
    }

    /// Category names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Iterate categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if the record has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for CategorizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.section)?;
        }
        map.end()
    }
}

/// Render a value for a key/value panel: strings unquoted, null as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &FieldMap, indent: &str) -> fmt::Result {
    for (label, value) in fields {
        writeln!(f, "{}{}: {}", indent, label, display_value(value))?;
    }
    Ok(())
}

impl fmt::Display for CategorizedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, category) in self.categories.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", category.name)?;
            writeln!(f, "{}", "-".repeat(category.name.len()))?;
            match &category.section {
                Section::Fields(fields) => write_fields(f, fields, "  ")?,
                Section::Entries(entries) if entries.is_empty() => writeln!(f, "  (none)")?,
                Section::Entries(entries) => {
                    for (n, entry) in entries.iter().enumerate() {
                        writeln!(f, "  [{}]", n)?;
                        write_fields(f, entry, "    ")?;
                    }
                }
                Section::Scalar(v) => writeln!(f, "  {}", display_value(v))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CategorizedRecord {
        let mut fields = FieldMap::new();
        fields.insert("Zeta".into(), json!(1));
        fields.insert("Alpha".into(), Value::Null);
        let mut record = CategorizedRecord::new();
        record.push("Second", Section::Fields(fields));
        record.push("First", Section::Entries(vec![]));
        record.push("Third", Section::Scalar(json!("x")));
        record
    }

    #[test]
    fn test_serialization_keeps_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"Second":{"Zeta":1,"Alpha":null},"First":[],"Third":"x"}"#
        );
    }

    #[test]
    fn test_lookup_and_names() {
        let record = sample();
        assert_eq!(record.len(), 3);
        assert_eq!(record.names().collect::<Vec<_>>(), ["Second", "First", "Third"]);
        assert!(record.get("First").unwrap().as_entries().unwrap().is_empty());
        assert!(record.get("Missing").is_none());
    }

    #[test]
    fn test_display_panels() {
        let text = sample().to_string();
        assert!(text.starts_with("Second\n------\n  Zeta: 1\n  Alpha: \n"));
        assert!(text.contains("First\n-----\n  (none)\n"));
        assert!(text.ends_with("Third\n-----\n  x\n"));
    }
}
