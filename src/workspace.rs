//! Per-artifact slots owned by the viewing shell.
//!
//! A [`Workspace`] holds at most one loaded artifact of each kind. Loading a
//! file replaces the slot for its kind; a failed load clears only that slot
//! and leaves every other slot as it was.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::DocumentError;
use crate::image::{AcquiredImage, TiffError};
use crate::protocol::extract_protocol_bytes;
use crate::record::CategorizedRecord;
use crate::session::extract_session;
use crate::table::{ScanTable, TableError};

/// Kinds of artifact the shell accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Scan-position table (`.csv`)
    ScanTable,
    /// Acquisition session descriptor (`.jdce`)
    Session,
    /// Protocol descriptor (`.mxprotocol`)
    Protocol,
    /// Acquired image (`.tif`, `.tiff`)
    Image,
}

impl ArtifactKind {
    /// Classify a file by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ArtifactKind::ScanTable),
            "jdce" => Some(ArtifactKind::Session),
            "mxprotocol" => Some(ArtifactKind::Protocol),
            "tif" | "tiff" => Some(ArtifactKind::Image),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::ScanTable => "scan table",
            ArtifactKind::Session => "session descriptor",
            ArtifactKind::Protocol => "protocol descriptor",
            ArtifactKind::Image => "image",
        }
    }
}

/// Errors from loading a file into a slot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File extension does not name a known artifact kind
    #[error("Unrecognized file type: {}", .0.display())]
    UnknownKind(PathBuf),

    /// I/O error reading the file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Scan table failed to load
    #[error(transparent)]
    Table(#[from] TableError),

    /// Descriptor failed to decode
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Image failed to load
    #[error(transparent)]
    Image(#[from] TiffError),
}

/// Loaded artifacts, one slot per kind.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Scan-position table
    pub scan_table: Option<ScanTable>,
    /// Session descriptor
    pub session: Option<CategorizedRecord>,
    /// Protocol descriptor
    pub protocol: Option<CategorizedRecord>,
    /// Acquired image
    pub image: Option<AcquiredImage>,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file into the slot matching its extension.
    pub fn load_path(&mut self, path: &Path) -> Result<ArtifactKind, LoadError> {
        let kind =
            ArtifactKind::from_path(path).ok_or_else(|| LoadError::UnknownKind(path.to_path_buf()))?;
        let bytes = fs::read(path)?;
        self.load(kind, bytes)?;
        Ok(kind)
    }

    /// Load raw bytes into the slot for `kind`, replacing what was there.
    pub fn load(&mut self, kind: ArtifactKind, bytes: Vec<u8>) -> Result<(), LoadError> {
        self.clear(kind);
        match kind {
            ArtifactKind::ScanTable => self.scan_table = Some(ScanTable::from_bytes(&bytes)?),
            ArtifactKind::Session => self.session = Some(extract_session(&bytes)?),
            ArtifactKind::Protocol => self.protocol = Some(extract_protocol_bytes(&bytes)?),
            ArtifactKind::Image => self.image = Some(AcquiredImage::from_bytes(bytes)?),
        }
        Ok(())
    }

    /// Empty the slot for `kind`.
    pub fn clear(&mut self, kind: ArtifactKind) {
        match kind {
            ArtifactKind::ScanTable => self.scan_table = None,
            ArtifactKind::Session => self.session = None,
            ArtifactKind::Protocol => self.protocol = None,
            ArtifactKind::Image => self.image = None,
        }
    }

    /// Returns true if the slot for `kind` holds an artifact.
    pub fn is_loaded(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::ScanTable => self.scan_table.is_some(),
            ArtifactKind::Session => self.session.is_some(),
            ArtifactKind::Protocol => self.protocol.is_some(),
            ArtifactKind::Image => self.image.is_some(),
        }
    }
}
