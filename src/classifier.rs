//! Separator detection
//!
//! A separator is a photo taken with the lens covered: every pixel sits at
//! or below `round(tolerance * max_luminance)`. One brighter pixel anywhere
//! makes it a content photo.

use std::path::Path;

use crate::decode::{LumaDecoder, LumaGrid};
use crate::error::DecodeError;

pub const DEFAULT_TOLERANCE: f64 = 0.2;

/// Luminance value at or below which a pixel counts as dark
pub fn dark_threshold(tolerance: f64, max_value: u16) -> u16 {
    (tolerance.clamp(0.0, 1.0) * f64::from(max_value)).round() as u16
}

/// True when no sample of the grid is brighter than the threshold
pub fn is_dark(grid: &LumaGrid, tolerance: f64) -> bool {
    let threshold = dark_threshold(tolerance, grid.max_value);
    !grid.samples.any_above(threshold)
}

/// Classifies photos as separators or content using a decoder
pub struct Classifier<'a> {
    decoder: &'a dyn LumaDecoder,
    tolerance: f64,
}

impl<'a> Classifier<'a> {
    pub fn new(decoder: &'a dyn LumaDecoder, tolerance: f64) -> Self {
        Self { decoder, tolerance }
    }

    /// Decode the photo and decide whether it is a separator.
    /// Decode failures are returned, never treated as either class.
    pub fn is_separator(&self, photo: &Path) -> Result<bool, DecodeError> {
        let grid = self.decoder.decode(photo)?;
        let separator = is_dark(&grid, self.tolerance);

        tracing::debug!(
            "{} ({}x{}) -> {} (threshold {} of {})",
            photo.display(),
            grid.width,
            grid.height,
            if separator { "separator" } else { "content" },
            dark_threshold(self.tolerance, grid.max_value),
            grid.max_value
        );

        Ok(separator)
    }
}
