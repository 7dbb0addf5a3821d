//! Display adjustments for acquired images.
//!
//! Acquired pages are 16-bit; they are shown as 8-bit grayscale with
//! brightness and contrast factors applied, then scaled by a zoom level.

use ::image::imageops::{self, FilterType};
use ::image::{GrayImage, ImageBuffer};

use super::tiff::{PixelBuffer, Samples};

/// Lower bound of the brightness and contrast factors.
pub const MIN_ENHANCE: f64 = 0.1;
/// Upper bound of the brightness and contrast factors.
pub const MAX_ENHANCE: f64 = 2.0;
/// Lower bound of the zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Upper bound of the zoom level.
pub const MAX_ZOOM: f64 = 5.0;
/// Multiplicative zoom step.
pub const ZOOM_STEP: f64 = 1.1;

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Scale samples to an 8-bit grayscale image. 16-bit values are divided by 256.
///
/// Returns `None` if the sample count does not match the dimensions.
pub fn to_display_8bit(buffer: &PixelBuffer) -> Option<GrayImage> {
    let raw = match &buffer.samples {
        Samples::U8(v) => v.clone(),
        Samples::U16(v) => v.iter().map(|&s| (s >> 8) as u8).collect(),
    };
    ImageBuffer::from_raw(buffer.width, buffer.height, raw)
}

/// Multiply every pixel by `factor`.
pub fn enhance_brightness(image: &mut GrayImage, factor: f64) {
    for px in image.pixels_mut() {
        px.0[0] = clamp_u8(px.0[0] as f64 * factor);
    }
}

/// Rounded mean intensity, the pivot for contrast changes.
pub fn mean_intensity(image: &GrayImage) -> u8 {
    let raw = image.as_raw();
    if raw.is_empty() {
        return 0;
    }
    let sum: u64 = raw.iter().map(|&p| p as u64).sum();
    clamp_u8(sum as f64 / raw.len() as f64)
}

/// Stretch every pixel away from (or toward) the mean by `factor`.
pub fn enhance_contrast(image: &mut GrayImage, factor: f64) {
    let mean = mean_intensity(image) as f64;
    for px in image.pixels_mut() {
        px.0[0] = clamp_u8(mean + factor * (px.0[0] as f64 - mean));
    }
}

/// Viewer state: brightness, contrast and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    brightness: f64,
    contrast: f64,
    zoom: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            zoom: 1.0,
        }
    }
}

impl ViewSettings {
    /// Build settings, clamping each factor to its range.
    pub fn new(brightness: f64, contrast: f64, zoom: f64) -> Self {
        let mut settings = Self::default();
        settings.set_brightness(brightness);
        settings.set_contrast(contrast);
        settings.set_zoom(zoom);
        settings
    }

    /// Brightness factor.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Contrast factor.
    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    /// Zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set brightness, clamped to `[MIN_ENHANCE, MAX_ENHANCE]`.
    pub fn set_brightness(&mut self, factor: f64) {
        self.brightness = clamp_factor(factor, MIN_ENHANCE, MAX_ENHANCE, 1.0);
    }

    /// Set contrast, clamped to `[MIN_ENHANCE, MAX_ENHANCE]`.
    pub fn set_contrast(&mut self, factor: f64) {
        self.contrast = clamp_factor(factor, MIN_ENHANCE, MAX_ENHANCE, 1.0);
    }

    /// Set zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_factor(zoom, MIN_ZOOM, MAX_ZOOM, 1.0);
    }

    /// One zoom step in.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    /// One zoom step out.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Output size of a `width` x `height` image at the current zoom.
    pub fn scaled_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.zoom) as u32).max(1);
        (scale(width), scale(height))
    }

    /// 8-bit display image of `buffer` with brightness then contrast applied.
    pub fn render(&self, buffer: &PixelBuffer) -> Option<GrayImage> {
        let mut image = to_display_8bit(buffer)?;
        enhance_brightness(&mut image, self.brightness);
        enhance_contrast(&mut image, self.contrast);
        Some(image)
    }

    /// `image` resized to the current zoom.
    pub fn zoomed(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = self.scaled_dimensions(image.width(), image.height());
        imageops::resize(image, width, height, FilterType::Triangle)
    }
}

fn clamp_factor(v: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if v.is_nan() {
        fallback
    } else {
        v.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer16(samples: Vec<u16>) -> PixelBuffer {
        PixelBuffer {
            width: samples.len() as u32,
            height: 1,
            samples: Samples::U16(samples),
        }
    }

    fn gray(pixels: Vec<u8>) -> GrayImage {
        GrayImage::from_raw(pixels.len() as u32, 1, pixels).unwrap()
    }

    #[test]
    fn test_16bit_downscale() {
        let img = to_display_8bit(&buffer16(vec![0, 255, 256, 32768, 65535])).unwrap();
        assert_eq!(img.as_raw(), &[0, 0, 1, 128, 255]);
        assert_eq!(img.dimensions(), (5, 1));
    }

    #[test]
    fn test_mismatched_buffer() {
        let buf = PixelBuffer {
            width: 4,
            height: 4,
            samples: Samples::U8(vec![0; 3]),
        };
        assert!(to_display_8bit(&buf).is_none());
    }

    #[test]
    fn test_brightness() {
        let mut img = gray(vec![0, 10, 100, 200]);
        enhance_brightness(&mut img, 1.5);
        assert_eq!(img.as_raw(), &[0, 15, 150, 255]);
    }

    #[test]
    fn test_contrast_pivots_on_mean() {
        let mut img = gray(vec![50, 150]);
        assert_eq!(mean_intensity(&img), 100);
        enhance_contrast(&mut img, 2.0);
        assert_eq!(img.as_raw(), &[0, 200]);

        let mut flat = gray(vec![80, 120]);
        enhance_contrast(&mut flat, 0.5);
        assert_eq!(flat.as_raw(), &[90, 110]);
    }

    #[test]
    fn test_neutral_settings_leave_pixels() {
        let buf = buffer16(vec![1000, 20000, 40000]);
        assert_eq!(ViewSettings::default().render(&buf), to_display_8bit(&buf));
    }

    #[test]
    fn test_factor_clamping() {
        let s = ViewSettings::new(5.0, 0.0, 100.0);
        assert_eq!(s.brightness(), MAX_ENHANCE);
        assert_eq!(s.contrast(), MIN_ENHANCE);
        assert_eq!(s.zoom(), MAX_ZOOM);
        assert_eq!(ViewSettings::new(f64::NAN, 1.0, 1.0).brightness(), 1.0);
    }

    #[test]
    fn test_zoom_steps() {
        let mut s = ViewSettings::default();
        s.zoom_in();
        assert!((s.zoom() - 1.1).abs() < 1e-12);
        s.zoom_out();
        assert!((s.zoom() - 1.0).abs() < 1e-12);
        for _ in 0..100 {
            s.zoom_out();
        }
        assert_eq!(s.zoom(), MIN_ZOOM);
        assert_eq!(s.scaled_dimensions(2048, 5), (204, 1));
    }

    #[test]
    fn test_zoomed_image_size() {
        let settings = ViewSettings::new(1.0, 1.0, 2.0);
        let img = gray(vec![10, 20, 30]);
        assert_eq!(settings.zoomed(&img).dimensions(), (6, 2));
    }
}
