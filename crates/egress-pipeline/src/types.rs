//! Shared types for the egress conversion pipeline.

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryError;
use crate::calibrate::CalibrationConstants;
use crate::grid::{CellAlphabet, SemanticGrid};
use crate::segment::LayerMasks;

/// Re-export `GrayImage` so downstream crates can reference layer and
/// boundary masks without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can reference the decoded
/// floorplan raster without depending on `image` directly.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an image buffer.
    #[must_use]
    pub fn of<P: image::Pixel, C: std::ops::Deref<Target = [P::Subpixel]>>(
        image: &image::ImageBuffer<P, C>,
    ) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Whether category segmentation runs before or after the shrink loop.
///
/// The two orders produce slightly different masks: shrinking first
/// thresholds the already-resampled colors, while segmenting first
/// thresholds at full resolution and then resamples each binary mask
/// down to the working size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShrinkOrder {
    /// Shrink the padded image, then segment at the working resolution.
    #[default]
    ShrinkThenSegment,
    /// Segment the padded full-resolution image, then shrink the image
    /// and resample each mask to the working resolution.
    SegmentThenShrink,
}

/// Configuration for the conversion pipeline.
///
/// Collapses the historical pipeline variants into explicit options:
/// border width, shrink factor and threshold, segmentation order, and
/// the grid cell alphabet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Width in pixels of the solid white margin added on all four
    /// sides before any masking, so boundary detection and door
    /// connectivity near the image edges are not clipped.
    pub border_px: u32,

    /// Shrink loop threshold: resampling stops once either dimension is
    /// at or below this size. A threshold at or above the input size
    /// short-circuits the loop to a no-op.
    pub min_dimension: u32,

    /// Per-step shrink factor, strictly between 0 and 1 (0.5 halves
    /// each step).
    pub shrink_factor: f32,

    /// Whether segmentation runs before or after the shrink loop.
    pub shrink_order: ShrinkOrder,

    /// Single-character cell codes used in the serialized grid.
    pub alphabet: CellAlphabet,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            border_px: 20,
            min_dimension: 200,
            shrink_factor: 0.5,
            shrink_order: ShrinkOrder::default(),
            alphabet: CellAlphabet::default(),
        }
    }
}

impl ConvertConfig {
    /// Check the configuration for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidConfig`] if `shrink_factor` is
    /// outside `(0, 1)` or the cell alphabet contains duplicate codes.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(ConvertError::InvalidConfig(format!(
                "shrink_factor must be in (0, 1), got {}",
                self.shrink_factor,
            )));
        }
        self.alphabet.validate().map_err(ConvertError::InvalidConfig)
    }
}

/// Result of running the conversion pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertResult {
    /// The assembled symbolic grid, one cell per working-resolution pixel.
    pub grid: SemanticGrid,

    /// Scale-derived simulation constants, computed once per conversion.
    pub calibration: CalibrationConstants,

    /// Working resolution: the coordinate system every mask and the grid
    /// share after normalization.
    pub dimensions: Dimensions,

    /// Cumulative resampling factor actually applied by the shrink loop
    /// (1.0 when the loop was a no-op).
    pub scale: f64,
}

/// Result of running the pipeline with intermediate stage outputs
/// preserved, for debug-artifact export and inspection.
///
/// Does not derive `PartialEq` because raster buffers are compared by
/// pixel data, which is rarely what a caller wants here.
#[derive(Debug, Clone)]
pub struct StagedConvert {
    /// Padded, shrunk floorplan at working resolution.
    pub normalized: RgbImage,
    /// Per-category binary layer masks at working resolution.
    pub masks: LayerMasks,
    /// Interior/exterior mask as supplied by the provider
    /// (255 = interior).
    pub boundary: GrayImage,
    /// The assembled symbolic grid.
    pub grid: SemanticGrid,
    /// Scale-derived simulation constants.
    pub calibration: CalibrationConstants,
    /// Working resolution.
    pub dimensions: Dimensions,
    /// Cumulative resampling factor actually applied.
    pub scale: f64,
}

/// Errors that can occur during conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Failed to decode the input image.
    #[error("failed to decode floorplan image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid conversion configuration: {0}")]
    InvalidConfig(String),

    /// The boundary mask provider failed.
    #[error("boundary mask provider failed: {0}")]
    Boundary(#[from] BoundaryError),

    /// The assembled grid contains no door cells, so no physical scale
    /// can be derived. The floorplan is rejected rather than letting an
    /// undefined mean poison every calibration constant.
    #[error("floorplan contains no door components to calibrate against")]
    NoDoorComponents,
}
