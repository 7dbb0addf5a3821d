//! # mxa-analyzer - Metadata Extraction for Microscope Acquisitions
//!
//! `mxa-analyzer` reads the artifacts a high-content imaging system leaves
//! behind after an acquisition run and normalizes them into display-ready
//! records:
//!
//! - **Scan-position tables** (`.csv`): one row per acquired image, with the
//!   image file name, well, stage position and filter pair moved to the front.
//! - **Session descriptors** (`.jdce`): JSON documents describing a run,
//!   flattened into twelve fixed categories.
//! - **Protocol descriptors** (`.mxprotocol`): JSON protocol definitions,
//!   flattened through static key maps.
//! - **Acquired images** (`.tif`): multi-page 16-bit TIFF whose pages carry an
//!   XML property block in their `ImageDescription` tag.
//!
//! Every extractor is a pure function of its input bytes. Document-level
//! problems are returned as errors; field-level problems degrade to empty
//! values (descriptors) or dropped properties with a warning (images).
//!
//! ## Quick Start
//!
//! ```rust
//! use mxa_analyzer::protocol::extract_protocol;
//!
//! let record = extract_protocol(r#"{"acquisitionEngineProtocol": {"commandId": "X1"}}"#)?;
//! let engine = record.get("Acquisition Engine Protocol").unwrap().as_fields().unwrap();
//! assert_eq!(engine["Command ID"], "X1");
//! assert_eq!(engine["Protocol Name"], "");
//! # Ok::<(), mxa_analyzer::document::DocumentError>(())
//! ```
//!
//! ```rust
//! use mxa_analyzer::image::{parse_property_block, PropertyValue};
//!
//! let md = parse_property_block(r#"<MetaData><prop id="Exposure" type="int" value="150"/></MetaData>"#);
//! assert_eq!(md.get("Exposure"), Some(&PropertyValue::Int(150)));
//! ```
//!
//! ## Architecture
//!
//! - [`tree`]: key-path traversal over JSON trees
//! - [`keymap`]: static path-to-label tables
//! - [`record`]: ordered categorized records
//! - [`table`]: scan-position tables, filtering and re-export
//! - [`session`]: session descriptor extraction
//! - [`protocol`]: protocol descriptor extraction
//! - [`image`]: TIFF container, property blocks and display adjustments
//! - [`workspace`]: one slot per artifact kind for a viewing shell

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod image;
pub mod keymap;
pub mod protocol;
pub mod record;
pub mod session;
pub mod table;
pub mod tree;
pub mod workspace;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::document::DocumentError;
    pub use crate::image::{
        extract_container_metadata, extract_tag_metadata, parse_property_block, AcquiredImage,
        DescribedPage, MetadataWarning, PropertyValue, TagMetadata, TiffError, TiffFile,
        ViewSettings,
    };
    pub use crate::keymap::{KeyMap, PathList};
    pub use crate::protocol::{extract_protocol, extract_protocol_bytes};
    pub use crate::record::{CategorizedRecord, FieldMap, Section};
    pub use crate::session::extract_session;
    pub use crate::table::{filtered_file_name, ScanTable, TableError, REQUIRED_COLUMNS};
    pub use crate::tree::{resolve_dotted, resolve_path, Resolved};
    pub use crate::workspace::{ArtifactKind, LoadError, Workspace};
}
