//! Photo decoding into luminance samples
//!
//! Ordinary image formats go through the `image` crate. Camera RAW files
//! are read straight from the sensor data with rawloader (see `raw.rs`).

pub mod raw;

use image::DynamicImage;
use std::path::Path;

use crate::error::DecodeError;

/// Camera RAW extensions handled by rawloader instead of the `image` crate
pub const RAW_EXTENSIONS: [&str; 16] = [
    "nef", "dng", "cr2", "cr3", "arw", "raf", "orf", "rw2",
    "pef", "srw", "erf", "kdc", "dcr", "mos", "raw", "rwl",
];

/// Luminance samples at the source's own bit depth
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Eight(Vec<u8>),
    Sixteen(Vec<u16>),
}

impl Samples {
    /// True as soon as one sample exceeds `threshold`
    pub fn any_above(&self, threshold: u16) -> bool {
        match self {
            Self::Eight(values) => values.iter().any(|&v| u16::from(v) > threshold),
            Self::Sixteen(values) => values.iter().any(|&v| v > threshold),
        }
    }
}

/// Luminance samples of one decoded photo
#[derive(Debug, Clone, PartialEq)]
pub struct LumaGrid {
    pub width: u32,
    pub height: u32,
    /// Largest luminance the source colour depth can represent
    pub max_value: u16,
    /// Row-major samples, `width * height` for images, one per sensor site for RAW data
    pub samples: Samples,
}

impl LumaGrid {
    pub fn from_image(img: &DynamicImage) -> Self {
        let color = img.color();
        let bits_per_channel = color.bits_per_pixel() / u16::from(color.channel_count());

        if bits_per_channel <= 8 {
            let luma = img.to_luma8();
            Self {
                width: luma.width(),
                height: luma.height(),
                max_value: u16::from(u8::MAX),
                samples: Samples::Eight(luma.into_raw()),
            }
        } else {
            let luma = img.to_luma16();
            Self {
                width: luma.width(),
                height: luma.height(),
                max_value: u16::MAX,
                samples: Samples::Sixteen(luma.into_raw()),
            }
        }
    }
}

/// Capability: decode a photo on disk into luminance samples
pub trait LumaDecoder {
    fn decode(&self, path: &Path) -> Result<LumaGrid, DecodeError>;
}

/// Default decoder, picks rawloader or the `image` crate by file extension
#[derive(Debug, Default, Clone, Copy)]
pub struct PhotoDecoder;

impl PhotoDecoder {
    pub fn is_raw(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| RAW_EXTENSIONS.contains(&ext.as_str()))
    }
}

impl LumaDecoder for PhotoDecoder {
    fn decode(&self, path: &Path) -> Result<LumaGrid, DecodeError> {
        if Self::is_raw(path) {
            return raw::load_luma(path);
        }

        let img = image::open(path).map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(LumaGrid::from_image(&img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

    #[test]
    fn test_rgb8_uses_8bit_range() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([255, 255, 255])));
        let grid = LumaGrid::from_image(&img);

        assert_eq!(grid.max_value, 255);
        assert_eq!((grid.width, grid.height), (3, 2));
        assert_eq!(grid.samples, Samples::Eight(vec![255; 6]));
    }

    #[test]
    fn test_16bit_uses_16bit_range() {
        let buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(2, 2, Luma([1000u16]));
        let grid = LumaGrid::from_image(&DynamicImage::ImageLuma16(buffer));

        assert_eq!(grid.max_value, u16::MAX);
        assert_eq!(grid.samples, Samples::Sixteen(vec![1000; 4]));
    }

    #[test]
    fn test_any_above_at_both_depths() {
        assert!(!Samples::Eight(vec![10, 51, 0]).any_above(51));
        assert!(Samples::Eight(vec![10, 52, 0]).any_above(51));
        assert!(Samples::Sixteen(vec![300, 13107]).any_above(13106));
        assert!(!Samples::Sixteen(Vec::new()).any_above(0));
    }

    #[test]
    fn test_raw_extension_detection() {
        assert!(PhotoDecoder::is_raw(Path::new("DSC_0001.NEF")));
        assert!(PhotoDecoder::is_raw(Path::new("img.dng")));
        assert!(!PhotoDecoder::is_raw(Path::new("img.jpg")));
        assert!(!PhotoDecoder::is_raw(Path::new("img")));
    }

    #[test]
    fn test_decode_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(4, 4, Luma([42])).save(&path).unwrap();

        let grid = PhotoDecoder.decode(&path).unwrap();
        assert_eq!(grid.samples, Samples::Eight(vec![42; 16]));
    }

    #[test]
    fn test_decode_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();

        assert!(matches!(
            PhotoDecoder.decode(&path),
            Err(DecodeError::Image { .. })
        ));
    }
}
