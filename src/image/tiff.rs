//! TIFF container access.
//!
//! Pages are enumerated once when the file is opened, keeping geometry,
//! sample layout and the `ImageDescription` text that carries the
//! acquisition property block. Pixel data is decoded on demand, one page at a
//! time, under [`Limits`] so a header declaring absurd dimensions fails
//! instead of exhausting memory.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use ::tiff::decoder::{Decoder, DecodingResult, Limits};
use ::tiff::tags::Tag;
use log::{debug, warn};

use super::error::TiffError;
use super::tag_metadata::DescribedPage;

/// Upper bound on the decoded size of one page, in bytes.
pub const MAX_DECODED_PAGE_BYTES: usize = 256 * 1024 * 1024;

fn decoding_limits() -> Limits {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = MAX_DECODED_PAGE_BYTES;
    limits
}

/// One page (IFD) of a TIFF file.
#[derive(Debug, Clone, PartialEq)]
pub struct TiffPage {
    /// Zero-based page index
    pub index: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per sample (first sample)
    pub bits_per_sample: u16,
    /// Samples per pixel
    pub samples_per_pixel: u16,
    description: Option<String>,
}

impl TiffPage {
    /// The `ImageDescription` tag text, if present.
    pub fn image_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn read<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
        index: usize,
    ) -> Result<Self, TiffError> {
        let (width, height) = decoder.dimensions()?;
        let bits_per_sample = decoder
            .find_tag_unsigned_vec::<u16>(Tag::BitsPerSample)?
            .and_then(|bits| bits.first().copied())
            .unwrap_or(1);
        let samples_per_pixel = decoder
            .find_tag_unsigned::<u16>(Tag::SamplesPerPixel)?
            .unwrap_or(1);

        // An unreadable description only loses the metadata, not the page
        let description = match decoder.find_tag(Tag::ImageDescription) {
            Ok(value) => value.and_then(|v| v.into_string().ok()),
            Err(e) => {
                warn!("Page {}: unreadable ImageDescription tag: {}", index, e);
                None
            }
        };

        Ok(Self {
            index,
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            description,
        })
    }
}

impl DescribedPage for TiffPage {
    fn description(&self) -> Option<&str> {
        self.image_description()
    }
}

/// Sample storage of a decoded page.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 8-bit samples
    U8(Vec<u8>),
    /// 16-bit samples
    U16(Vec<u16>),
}

/// Raw pixel buffer of a single-sample page, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel samples
    pub samples: Samples,
}

/// A parsed TIFF container.
#[derive(Debug, Clone)]
pub struct TiffFile {
    data: Vec<u8>,
    pages: Vec<TiffPage>,
}

impl TiffFile {
    /// Read and parse a TIFF file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TiffError> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Parse a TIFF file held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TiffError> {
        let pages = {
            let mut decoder = Self::open(&data)?;
            let mut pages = vec![TiffPage::read(&mut decoder, 0)?];
            while decoder.more_images() {
                decoder.next_image()?;
                pages.push(TiffPage::read(&mut decoder, pages.len())?);
            }
            pages
        };

        debug!("Parsed TIFF container: {} pages", pages.len());
        Ok(Self { data, pages })
    }

    fn open(data: &[u8]) -> Result<Decoder<Cursor<&[u8]>>, TiffError> {
        Ok(Decoder::new(Cursor::new(data))?.with_limits(decoding_limits()))
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages in file order.
    pub fn pages(&self) -> &[TiffPage] {
        &self.pages
    }

    /// One page by index.
    pub fn page(&self, index: usize) -> Result<&TiffPage, TiffError> {
        self.pages.get(index).ok_or(TiffError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }

    /// Decode the pixel buffer of a single-sample 8- or 16-bit page.
    pub fn pixels(&self, index: usize) -> Result<PixelBuffer, TiffError> {
        let page = self.page(index)?;
        if page.samples_per_pixel != 1 {
            return Err(TiffError::UnsupportedLayout(format!(
                "{} samples per pixel",
                page.samples_per_pixel
            )));
        }

        let mut decoder = Self::open(&self.data)?;
        for _ in 0..index {
            decoder.next_image()?;
        }
        let samples = match decoder.read_image()? {
            DecodingResult::U8(v) => Samples::U8(v),
            DecodingResult::U16(v) => Samples::U16(v),
            _ => {
                return Err(TiffError::UnsupportedLayout(format!(
                    "{} bits per sample",
                    page.bits_per_sample
                )))
            }
        };
        Ok(PixelBuffer {
            width: page.width,
            height: page.height,
            samples,
        })
    }
}
