//! Acquisition properties embedded in a page's `ImageDescription` tag.
//!
//! The acquisition software writes an XML fragment into the description of
//! every page, with one `<prop id=".." type=".." value=".."/>` element per
//! property. [`parse_property_block`] collects those elements into a flat
//! [`TagMetadata`] mapping. Parsing is best effort: a property whose value
//! does not match its declared type is dropped, and a malformed document
//! keeps whatever was read before the error. Each problem is logged and
//! recorded as a [`MetadataWarning`].

use std::fmt;

use log::{debug, error, warn};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::MetadataWarning;

/// Conventional name of the tag holding the property block.
pub const DESCRIPTION_TAG: &str = "ImageDescription";

/// Anything exposing a page's descriptive text tag.
pub trait DescribedPage {
    /// Text of the `ImageDescription` tag, if the page has one.
    fn description(&self) -> Option<&str>;
}

impl DescribedPage for str {
    fn description(&self) -> Option<&str> {
        Some(self)
    }
}

impl DescribedPage for Option<String> {
    fn description(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Declared `int`
    Int(i64),
    /// Declared `float`
    Float(f64),
    /// Any other declared type, kept as text
    Text(String),
}

impl PropertyValue {
    /// Convert `value` according to `declared_type`.
    ///
    /// Returns `None` when an `int` or `float` value does not parse.
    pub fn convert(declared_type: Option<&str>, value: &str) -> Option<Self> {
        match declared_type {
            Some("int") => value.trim().parse().ok().map(PropertyValue::Int),
            Some("float") => value.trim().parse().ok().map(PropertyValue::Float),
            _ => Some(PropertyValue::Text(value.to_string())),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Int(v) => serializer.serialize_i64(*v),
            PropertyValue::Float(v) => serializer.serialize_f64(*v),
            PropertyValue::Text(v) => serializer.serialize_str(v),
        }
    }
}

/// Flat property mapping plus the warnings met while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMetadata {
    properties: Vec<(String, PropertyValue)>,
    /// Non-fatal problems, in the order they were met
    pub warnings: Vec<MetadataWarning>,
}

impl TagMetadata {
    /// Look up a property by id.
    pub fn get(&self, id: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v)
    }

    /// Returns true if a property with this id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Set a property. An existing id keeps its position and takes the new value.
    pub fn insert(&mut self, id: impl Into<String>, value: PropertyValue) {
        let id = id.into();
        match self.properties.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((id, value)),
        }
    }

    /// Properties in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Merge `other` into `self`: later values overwrite, warnings accumulate.
    pub fn merge(&mut self, other: TagMetadata) {
        for (id, value) in other.properties {
            self.insert(id, value);
        }
        self.warnings.extend(other.warnings);
    }

    fn warn(&mut self, warning: MetadataWarning) {
        match &warning {
            MetadataWarning::TagParse(_) => error!("{}", warning),
            _ => warn!("{}", warning),
        }
        self.warnings.push(warning);
    }
}

impl Serialize for TagMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (id, value) in &self.properties {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

struct PropAttributes {
    id: Option<String>,
    declared_type: Option<String>,
    value: Option<String>,
}

fn read_prop_attributes(e: &BytesStart, decoder: Decoder) -> Result<PropAttributes, String> {
    let mut attrs = PropAttributes {
        id: None,
        declared_type: None,
        value: None,
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let text = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| e.to_string())?
            .into_owned();
        match attr.key.as_ref() {
            b"id" => attrs.id = Some(text),
            b"type" => attrs.declared_type = Some(text),
            b"value" => attrs.value = Some(text),
            _ => {}
        }
    }
    Ok(attrs)
}

fn store_property(metadata: &mut TagMetadata, attrs: PropAttributes) {
    let Some(id) = attrs.id else {
        metadata.warn(MetadataWarning::MissingAttribute {
            id: None,
            attribute: "id",
        });
        return;
    };
    let Some(value) = attrs.value else {
        metadata.warn(MetadataWarning::MissingAttribute {
            id: Some(id),
            attribute: "value",
        });
        return;
    };
    match PropertyValue::convert(attrs.declared_type.as_deref(), &value) {
        Some(converted) => metadata.insert(id, converted),
        None => metadata.warn(MetadataWarning::PropertyConversion {
            id,
            declared_type: attrs.declared_type.unwrap_or_default(),
            value,
        }),
    }
}

/// Parse an XML property block into a flat mapping.
///
/// Every element named `prop`, at any depth, contributes one property.
pub fn parse_property_block(text: &str) -> TagMetadata {
    let mut metadata = TagMetadata::default();
    let mut reader = Reader::from_str(text);
    let mut depth = 0usize;
    let mut seen_element = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                metadata.warn(MetadataWarning::TagParse(format!(
                    "{} at position {}",
                    e,
                    reader.error_position()
                )));
                break;
            }
        };
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                seen_element = true;
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
                if e.name().as_ref() == b"prop" {
                    match read_prop_attributes(e, reader.decoder()) {
                        Ok(attrs) => store_property(&mut metadata, attrs),
                        Err(msg) => {
                            metadata.warn(MetadataWarning::TagParse(msg));
                            break;
                        }
                    }
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(ref t) if !seen_element && !t.iter().all(u8::is_ascii_whitespace) => {
                metadata.warn(MetadataWarning::TagParse(
                    "text outside of a root element".into(),
                ));
                break;
            }
            Event::Eof => {
                if depth > 0 {
                    metadata.warn(MetadataWarning::TagParse(
                        "unexpected end of document inside an element".into(),
                    ));
                } else if !seen_element {
                    metadata.warn(MetadataWarning::TagParse("no element found".into()));
                }
                break;
            }
            _ => {}
        }
    }

    debug!(
        "Parsed property block: {} properties, {} warnings",
        metadata.len(),
        metadata.warnings.len()
    );
    metadata
}

/// Extract the property block of one page.
///
/// A page without a description yields an empty mapping.
pub fn extract_tag_metadata<P: DescribedPage + ?Sized>(page: &P) -> TagMetadata {
    match page.description() {
        Some(text) => parse_property_block(text),
        None => {
            debug!("Page has no {} tag", DESCRIPTION_TAG);
            TagMetadata::default()
        }
    }
}

/// Merge the property blocks of several pages in page order.
pub fn extract_container_metadata<'a, P, I>(pages: I) -> TagMetadata
where
    P: DescribedPage + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut merged = TagMetadata::default();
    for page in pages {
        merged.merge(extract_tag_metadata(page));
    }
    merged
}
