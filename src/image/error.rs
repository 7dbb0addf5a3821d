use std::fmt;
use std::io;

use ::tiff::{TiffError as DecodeError, TiffFormatError};

/// Errors that can occur while reading a TIFF container
#[derive(Debug, thiserror::Error)]
pub enum TiffError {
    /// I/O error reading the image file
    #[error("Failed to read file: {0}")]
    IoError(#[from] io::Error),

    /// File does not start with a TIFF header
    #[error("Not a TIFF file")]
    NotTiff,

    /// A structure points past the end of the file
    #[error("Truncated TIFF data: {0}")]
    Truncated(String),

    /// Decoding a page would need more memory than the configured limit
    #[error("Image exceeds decoding limits")]
    LimitsExceeded,

    /// The container is malformed
    #[error("Invalid TIFF data: {0}")]
    Malformed(String),

    /// Requested page does not exist
    #[error("Page {index} out of range (file has {count} pages)")]
    PageOutOfRange {
        /// Requested page index
        index: usize,
        /// Number of pages in the file
        count: usize,
    },

    /// Pixel layout the reader cannot decode
    #[error("Unsupported image layout: {0}")]
    UnsupportedLayout(String),
}

impl From<DecodeError> for TiffError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::FormatError(
                TiffFormatError::TiffSignatureNotFound | TiffFormatError::TiffSignatureInvalid,
            ) => TiffError::NotTiff,
            DecodeError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                TiffError::Truncated(e.to_string())
            }
            DecodeError::IoError(e) => TiffError::IoError(e),
            DecodeError::LimitsExceeded => TiffError::LimitsExceeded,
            DecodeError::UnsupportedError(e) => TiffError::UnsupportedLayout(e.to_string()),
            other => TiffError::Malformed(other.to_string()),
        }
    }
}

/// Non-fatal problem met while reading an embedded property block.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataWarning {
    /// A property's value does not parse as its declared type
    PropertyConversion {
        /// Property identifier
        id: String,
        /// Declared type (`int` or `float`)
        declared_type: String,
        /// Offending text
        value: String,
    },
    /// A property lacks an attribute needed to store it
    MissingAttribute {
        /// Property identifier, if it has one
        id: Option<String>,
        /// Name of the absent attribute
        attribute: &'static str,
    },
    /// The block as a whole is not well-formed XML
    TagParse(String),
}

impl fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataWarning::PropertyConversion {
                id,
                declared_type,
                value,
            } => write!(
                f,
                "Could not convert value '{}' to type '{}' for id '{}'",
                value, declared_type, id
            ),
            MetadataWarning::MissingAttribute { id: Some(id), attribute } => {
                write!(f, "Property '{}' has no '{}' attribute", id, attribute)
            }
            MetadataWarning::MissingAttribute { id: None, attribute } => {
                write!(f, "Property without '{}' attribute", attribute)
            }
            MetadataWarning::TagParse(msg) => write!(f, "XML parse error: {}", msg),
        }
    }
}
