//! RAW sensor data loader
//!
//! Reads the actual sensor data from RAW files (not the embedded JPEG) and
//! exposes it as luminance samples. Each CFA site is treated as one sample,
//! which is enough to tell an all-dark frame from a real photo.
//!
//! For documents a viewable preview is needed instead: the largest embedded
//! JPEG, or a grayscale rendering of the sensor data when there is none.

use image::{DynamicImage, GrayImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use super::{LumaGrid, Samples};
use crate::error::DecodeError;

/// JPEG bytes that can be embedded in a document, with their pixel size
#[derive(Debug, Clone)]
pub struct RawPreview {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Get a JPEG preview of a RAW file
pub fn load_preview(path: &Path) -> Result<RawPreview, DecodeError> {
    let data = fs::read(path).map_err(|source| DecodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(preview) = largest_embedded_jpeg(&data) {
        tracing::debug!(
            "Using {}KB embedded JPEG ({}x{}) from {}",
            preview.jpeg.len() / 1024,
            preview.width,
            preview.height,
            path.display()
        );
        return Ok(preview);
    }

    // No embedded JPEG: render the sensor data instead
    let grid = load_luma(path)?;
    let gray = render_gray(&grid).ok_or_else(|| DecodeError::Raw {
        path: path.to_path_buf(),
        message: "sensor data does not match its dimensions".to_string(),
    })?;

    let mut jpeg = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Rendered sensor data of {} as preview", path.display());
    Ok(RawPreview {
        jpeg,
        width: grid.width,
        height: grid.height,
    })
}

/// Scan for JPEG markers and keep the largest JPEG that actually decodes
fn largest_embedded_jpeg(buffer: &[u8]) -> Option<RawPreview> {
    let jpeg_start = b"\xff\xd8\xff"; // SOI followed by a marker
    let jpeg_end = b"\xff\xd9"; // EOI

    let mut largest: Option<RawPreview> = None;
    let mut pos = 0;

    while pos + jpeg_start.len() <= buffer.len() {
        if !buffer[pos..].starts_with(jpeg_start) {
            pos += 1;
            continue;
        }

        let Some(end) = buffer[pos..]
            .windows(2)
            .position(|w| w == jpeg_end)
            .map(|p| pos + p + 2)
        else {
            break;
        };

        let candidate = &buffer[pos..end];
        let is_larger = largest
            .as_ref()
            .map_or(true, |best| candidate.len() > best.jpeg.len());

        if is_larger {
            if let Ok(img) = image::load_from_memory_with_format(candidate, ImageFormat::Jpeg) {
                largest = Some(RawPreview {
                    jpeg: candidate.to_vec(),
                    width: img.width(),
                    height: img.height(),
                });
            }
        }

        pos = end;
    }

    largest
}

/// Scale sensor samples to 8 bits, keeping the first sample of each site
fn render_gray(grid: &LumaGrid) -> Option<GrayImage> {
    let Samples::Sixteen(values) = &grid.samples else {
        return None;
    };

    let sites = grid.width as usize * grid.height as usize;
    if sites == 0 || values.len() < sites {
        return None;
    }
    let per_site = values.len() / sites;
    let max = u32::from(grid.max_value.max(1));

    let pixels: Vec<u8> = values
        .iter()
        .step_by(per_site)
        .take(sites)
        .map(|&v| (u32::from(v).min(max) * 255 / max) as u8)
        .collect();

    GrayImage::from_raw(grid.width, grid.height, pixels)
}

/// Load the sensor data of a RAW file with the black level removed
pub fn load_luma(path: &Path) -> Result<LumaGrid, DecodeError> {
    let raw_image = rawloader::decode_file(path).map_err(|e| DecodeError::Raw {
        path: path.to_path_buf(),
        message: format!("{:?}", e),
    })?;

    let black = raw_image.blacklevels.iter().copied().min().unwrap_or(0);
    let white = raw_image.whitelevels.iter().copied().max().unwrap_or(u16::MAX);

    // rawloader returns data in different formats, normalize to u16
    let values: Vec<u16> = match &raw_image.data {
        rawloader::RawImageData::Integer(values) => {
            values.iter().map(|&v| v.saturating_sub(black)).collect()
        }
        rawloader::RawImageData::Float(values) => values
            .iter()
            .map(|&v| (v * 65535.0).clamp(0.0, 65535.0) as u16)
            .collect(),
    };

    let max_value = match &raw_image.data {
        rawloader::RawImageData::Integer(_) => white.saturating_sub(black).max(1),
        rawloader::RawImageData::Float(_) => u16::MAX,
    };

    tracing::debug!(
        "Loaded RAW data: {}x{} ({} samples, black {}, white {})",
        raw_image.width,
        raw_image.height,
        values.len(),
        black,
        white
    );

    Ok(LumaGrid {
        width: raw_image.width as u32,
        height: raw_image.height as u32,
        max_value,
        samples: Samples::Sixteen(values),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{Rgb, RgbImage};

    fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([180, 90, 20])))
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        jpeg
    }

    #[test]
    fn test_missing_raw_file_fails() {
        let result = load_luma(Path::new("/nonexistent/path.nef"));
        assert!(matches!(result, Err(DecodeError::Raw { .. })));
    }

    #[test]
    fn test_preview_of_missing_file_fails() {
        let result = load_preview(Path::new("/nonexistent/path.nef"));
        assert!(matches!(result, Err(DecodeError::Read { .. })));
    }

    #[test]
    fn test_preview_picks_largest_embedded_jpeg() {
        let mut data = b"II*\0 fake tiff header".to_vec();
        data.extend(encode_jpeg(16, 12));
        data.extend(b"padding between images");
        data.extend(encode_jpeg(64, 48));
        data.extend(b"trailing sensor data");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DSC_0001.nef");
        fs::write(&path, &data).unwrap();

        let preview = load_preview(&path).unwrap();
        assert_eq!((preview.width, preview.height), (64, 48));
        assert!(preview.jpeg.starts_with(b"\xff\xd8\xff"));
        assert!(preview.jpeg.ends_with(b"\xff\xd9"));
    }

    #[test]
    fn test_broken_jpeg_markers_are_skipped() {
        let mut data = b"\xff\xd8\xffnot really a jpeg\xff\xd9".to_vec();
        data.extend(encode_jpeg(8, 8));

        let preview = largest_embedded_jpeg(&data).unwrap();
        assert_eq!((preview.width, preview.height), (8, 8));
        assert!(largest_embedded_jpeg(b"no markers here").is_none());
    }

    #[test]
    fn test_render_gray_scales_to_8bit() {
        let grid = LumaGrid {
            width: 2,
            height: 1,
            max_value: 1000,
            samples: Samples::Sixteen(vec![0, 1000]),
        };
        let gray = render_gray(&grid).unwrap();
        assert_eq!(gray.into_raw(), vec![0, 255]);

        let short = LumaGrid {
            width: 4,
            height: 4,
            max_value: 1000,
            samples: Samples::Sixteen(vec![0; 3]),
        };
        assert!(render_gray(&short).is_none());
    }
}
