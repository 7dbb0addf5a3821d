//! # Acquisition Session Descriptors
//!
//! An acquisition session descriptor (`.jdce`) is a JSON document describing
//! one acquisition run: the instrument software that produced it, camera and
//! objective calibration, plate geometry, per-wavelength imaging settings and
//! provenance (project, user, operator, specimen holder).
//!
//! [`extract_session`] flattens the document into twelve categories, always
//! in the order of [`SESSION_CATEGORIES`]. Fields that are missing from the
//! input, or sit under a node of the wrong shape, are reported as `null`.
//!
//! ```rust
//! use mxa_analyzer::session::extract_session;
//!
//! let record = extract_session(br#"{"Version": "1.0", "ImageStack": {"Uuid": "abc"}}"#)?;
//! let general = record.get("General Information").unwrap().as_fields().unwrap();
//! assert_eq!(general["Uuid"], "abc");
//! assert!(general["PlateId"].is_null());
//! # Ok::<(), mxa_analyzer::document::DocumentError>(())
//! ```

use log::debug;
use serde_json::Value;

use crate::document::{parse_document, DocumentError};
use crate::record::{CategorizedRecord, FieldMap, Section};
use crate::tree::resolve_path;


/// Category names in output order.
pub const SESSION_CATEGORIES: [&str; 12] = [
    "General Information",
    "Application Details",
    "Creation Timestamp",
    "Camera Settings",
    "Objective Calibration",
    "Plate Information",
    "Wavelength Settings",
    "Plate Map Parameters",
    "Project Information",
    "Operator Information",
    "Specimen Holder",
    "Image Metadata Files",
];

const IMAGE_STACK: &str = "ImageStack";
const PROTOCOL: &str = "AutoLeadAcquisitionProtocol";

/// One labeled field: output label and path relative to the category base.
type FieldSpec = (&'static str, &'static [&'static str]);

/// A flat category: base path under the document root plus its fields.
struct CategorySpec {
    name: &'static str,
    base: &'static [&'static str],
    fields: &'static [FieldSpec],
}

const APPLICATION: CategorySpec = CategorySpec {
    name: "Application Details",
    base: &[IMAGE_STACK, "Application"],
    fields: &[("Name", &["Name"]), ("SoftwareLabel", &["SoftwareLabel"])],
};

const CREATION: CategorySpec = CategorySpec {
    name: "Creation Timestamp",
    base: &[IMAGE_STACK, "Creation"],
    fields: &[
        ("Date", &["Date"]),
        ("Time", &["Time"]),
        ("TimeZoneOffset", &["TimeZoneOffset"]),
    ],
};

const CAMERA: CategorySpec = CategorySpec {
    name: "Camera Settings",
    base: &[IMAGE_STACK, PROTOCOL, "Camera"],
    fields: &[
        ("Width", &["Size", "Width"]),
        ("Height", &["Size", "Height"]),
        ("Binning", &["Binning"]),
    ],
};

const OBJECTIVE: CategorySpec = CategorySpec {
    name: "Objective Calibration",
    base: &[IMAGE_STACK, PROTOCOL, "ObjectiveCalibration"],
    fields: &[
        ("Unit", &["Unit"]),
        ("ObjectiveName", &["ObjectiveName"]),
        ("PixelWidth", &["PixelWidth"]),
        ("PixelHeight", &["PixelHeight"]),
    ],
};

const PLATE: CategorySpec = CategorySpec {
    name: "Plate Information",
    base: &[IMAGE_STACK, PROTOCOL, "Plate"],
    fields: &[
        ("Name", &["Name"]),
        ("Rows", &["Rows"]),
        ("Columns", &["Columns"]),
        ("TopLeftWellCenterOffset", &["TopLeftWellCenterOffset"]),
        ("WellParameters", &["WellParameters"]),
        ("WellSpacing", &["WellSpacing"]),
    ],
};

const WAVELENGTH_BASE: &[&str] = &[IMAGE_STACK, PROTOCOL, "Wavelengths"];

const WAVELENGTH_FIELDS: &[FieldSpec] = &[
    ("Index", &["Index"]),
    ("ImagingMode", &["ImagingMode"]),
    ("ZSlice", &["ZSlice"]),
    ("ZStep", &["ZStep"]),
    ("EmissionFilter", &["EmissionFilter"]),
    ("ExcitationFilter", &["ExcitationFilter"]),
];

const PLATE_MAP: CategorySpec = CategorySpec {
    name: "Plate Map Parameters",
    base: &[IMAGE_STACK, PROTOCOL, "PlateMap"],
    fields: &[
        ("ZDimensionParameters", &["ZDimensionParameters"]),
        ("TimeSchedule", &["TimeSchedule"]),
    ],
};

const PROJECT: CategorySpec = CategorySpec {
    name: "Project Information",
    base: &[IMAGE_STACK, PROTOCOL, "ProjectInformation"],
    fields: &[
        ("ProjectName", &["Project", "Name"]),
        ("UserName", &["User", "Name"]),
    ],
};

const OPERATOR: CategorySpec = CategorySpec {
    name: "Operator Information",
    base: &[IMAGE_STACK, "Operator"],
    fields: &[("Login", &["Login"])],
};

const SPECIMEN_HOLDER: CategorySpec = CategorySpec {
    name: "Specimen Holder",
    base: &[IMAGE_STACK, "SpecimenHolder"],
    fields: &[
        ("Type", &["Type"]),
        ("Label", &["Label"]),
        ("Barcode", &["Barcode"]),
        ("Description", &["Description"]),
    ],
};

static NULL: Value = Value::Null;

fn node<'a>(root: &'a Value, path: &[&str]) -> &'a Value {
    resolve_path(root, path).value().unwrap_or(&NULL)
}

fn resolve_fields(base: &Value, fields: &[FieldSpec]) -> FieldMap {
    fields
        .iter()
        .map(|(label, path)| (label.to_string(), resolve_path(base, *path).or_null()))
        .collect()
}

fn flat_section(root: &Value, spec: &CategorySpec) -> Section {
    Section::Fields(resolve_fields(node(root, spec.base), spec.fields))
}

fn general_information(root: &Value) -> Section {
    let mut fields = FieldMap::new();
    fields.insert("Version".into(), resolve_path(root, &["Version"]).or_null());
    let stack = node(root, &[IMAGE_STACK]);
    for key in [
        "PlateId",
        "Uuid",
        "ImageFormat",
        "LargeImage",
        "CollectionComplete",
    ] {
        fields.insert(key.into(), resolve_path(stack, &[key]).or_null());
    }
    Section::Fields(fields)
}

fn wavelength_settings(root: &Value) -> Section {
    let entries = match resolve_path(root, WAVELENGTH_BASE).value() {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| resolve_fields(item, WAVELENGTH_FIELDS))
            .collect(),
        _ => Vec::new(),
    };
    Section::Entries(entries)
}

fn image_metadata_files(root: &Value) -> Section {
    let first = match resolve_path(root, &[IMAGE_STACK, "ImageMetadataFiles"]).value() {
        Some(Value::Array(items)) => items.first().cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    };
    let mut fields = FieldMap::new();
    fields.insert("Filename".into(), first);
    Section::Fields(fields)
}

/// Build the categorized record from an already decoded document.
///
/// Never fails: every shape problem degrades to `null` fields.
pub fn categorize_session(root: &Value) -> CategorizedRecord {
    let mut record = CategorizedRecord::new();
    record.push(SESSION_CATEGORIES[0], general_information(root));
    for spec in [&APPLICATION, &CREATION, &CAMERA, &OBJECTIVE, &PLATE] {
        record.push(spec.name, flat_section(root, spec));
    }
    record.push(SESSION_CATEGORIES[6], wavelength_settings(root));
    for spec in [&PLATE_MAP, &PROJECT, &OPERATOR, &SPECIMEN_HOLDER] {
        record.push(spec.name, flat_section(root, spec));
    }
    record.push(SESSION_CATEGORIES[11], image_metadata_files(root));
    record
}

/// Extract a session descriptor from raw file bytes.
///
/// Fails only when the bytes are not a JSON document.
pub fn extract_session(bytes: &[u8]) -> Result<CategorizedRecord, DocumentError> {
    let root = parse_document(bytes, "session descriptor")?;
    let record = categorize_session(&root);
    debug!(
        "Extracted session descriptor: {} categories, {} wavelength channels",
        record.len(),
        record
            .get("Wavelength Settings")
            .and_then(Section::as_entries)
            .map_or(0, <[FieldMap]>::len)
    );
    Ok(record)
}
