//! # Acquired Images
//!
//! Multi-page 16-bit TIFF images written by the acquisition software. Each
//! page carries an XML property block in its `ImageDescription` tag.
//!
//! - [`tiff`]: container access (pages, geometry, decoded pixel buffers)
//! - [`tag_metadata`]: property block extraction
//! - [`adjust`]: 8-bit display rendering with brightness, contrast and zoom
//!
//! Decoding goes through the `tiff` crate; display images are `image`
//! buffers and previews are saved in whatever format the path's extension
//! names.

pub mod adjust;
mod error;
pub mod tag_metadata;
pub mod tiff;

use std::path::Path;

use ::image::{GrayImage, ImageResult};
use log::{info, warn};

pub use self::adjust::ViewSettings;
pub use self::error::{MetadataWarning, TiffError};
pub use self::tag_metadata::{
    extract_container_metadata, extract_tag_metadata, parse_property_block, DescribedPage,
    PropertyValue, TagMetadata,
};
pub use self::tiff::{PixelBuffer, Samples, TiffFile, TiffPage};

/// An 8-bit rendering of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    /// Adjusted grayscale image at source resolution
    pub image: GrayImage,
    /// Width and height the view is shown at
    pub display_size: (u32, u32),
    zoomed: GrayImage,
}

impl RenderedView {
    /// The view resized to its display size.
    pub fn display_image(&self) -> &GrayImage {
        &self.zoomed
    }

    /// Save the displayed view; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.zoomed.save(path)
    }
}

/// A loaded acquisition image.
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    file: TiffFile,
}

impl AcquiredImage {
    /// Load from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TiffError> {
        Self::from_tiff(TiffFile::from_path(path)?)
    }

    /// Load from bytes held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TiffError> {
        Self::from_tiff(TiffFile::from_bytes(data)?)
    }

    fn from_tiff(file: TiffFile) -> Result<Self, TiffError> {
        let first = file.page(0)?;
        if first.bits_per_sample != 16 {
            warn!(
                "Non-16-bit image opened ({} bits per sample); display may be unexpected",
                first.bits_per_sample
            );
        }
        info!(
            "Loaded image: {} pages, {}x{}",
            file.page_count(),
            first.width,
            first.height
        );
        Ok(Self { file })
    }

    /// The underlying container.
    pub fn file(&self) -> &TiffFile {
        &self.file
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.file.page_count()
    }

    /// Property block of one page.
    pub fn page_metadata(&self, index: usize) -> Result<TagMetadata, TiffError> {
        Ok(extract_tag_metadata(self.file.page(index)?))
    }

    /// Property blocks of all pages merged in page order.
    pub fn metadata(&self) -> TagMetadata {
        extract_container_metadata(self.file.pages())
    }

    /// Render one page for display.
    pub fn render(&self, index: usize, settings: &ViewSettings) -> Result<RenderedView, TiffError> {
        let buffer = self.file.pixels(index)?;
        let image = settings.render(&buffer).ok_or_else(|| {
            TiffError::UnsupportedLayout(format!(
                "page {} pixel data does not match {}x{}",
                index, buffer.width, buffer.height
            ))
        })?;
        let zoomed = settings.zoomed(&image);
        Ok(RenderedView {
            display_size: zoomed.dimensions(),
            image,
            zoomed,
        })
    }
}
