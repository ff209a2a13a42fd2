//! egress-pipeline: Pure floorplan conversion pipeline (sans-IO).
//!
//! Converts a color-coded floorplan raster into the symbolic grid and
//! calibration constants consumed by the evacuation simulation engine:
//! pad -> shrink -> HSV layer segmentation -> boundary merge ->
//! door-size calibration.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. Filesystem and network
//! interaction live in `egress-io`.

pub mod border;
pub mod boundary;
pub mod calibrate;
pub mod color;
pub mod grid;
pub mod segment;
pub mod shrink;
pub mod types;

pub use boundary::{BoundaryError, BoundaryProvider};
pub use calibrate::{CalibrationConstants, Mobility};
pub use grid::{Cell, CellAlphabet, SemanticGrid};
pub use segment::LayerMasks;
pub use types::{
    ConvertConfig, ConvertError, ConvertResult, Dimensions, GrayImage, RgbImage, ShrinkOrder,
    StagedConvert,
};

/// Run the full conversion pipeline.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP), a boundary mask
/// provider, and a configuration, and produces a [`ConvertResult`]
/// holding the symbolic grid and the calibration constants.
///
/// # Pipeline steps
///
/// 1. Decode the combined floorplan image
/// 2. Pad with a solid white margin
/// 3. Shrink to the working resolution (nearest-neighbor)
/// 4. Segment per-category layer masks in HSV space
///    (before or after the shrink, per configuration)
/// 5. Obtain the interior/exterior mask from the provider
/// 6. Assemble the grid in precedence order
/// 7. Calibrate door size and derive simulation constants
///
/// # Errors
///
/// Returns [`ConvertError::InvalidConfig`] for an unusable configuration,
/// [`ConvertError::EmptyInput`] if `image_bytes` is empty,
/// [`ConvertError::ImageDecode`] if the image cannot be decoded,
/// [`ConvertError::Boundary`] if the provider fails, and
/// [`ConvertError::NoDoorComponents`] if the floorplan has no doors to
/// calibrate against.
pub fn convert(
    image_bytes: &[u8],
    boundary: &dyn BoundaryProvider,
    config: &ConvertConfig,
) -> Result<ConvertResult, ConvertError> {
    let staged = convert_staged(image_bytes, boundary, config)?;
    Ok(ConvertResult {
        grid: staged.grid,
        calibration: staged.calibration,
        dimensions: staged.dimensions,
        scale: staged.scale,
    })
}

/// Run the conversion pipeline, retaining every intermediate stage
/// output for inspection and debug-artifact export.
///
/// # Errors
///
/// Same failure modes as [`convert`].
pub fn convert_staged(
    image_bytes: &[u8],
    boundary: &dyn BoundaryProvider,
    config: &ConvertConfig,
) -> Result<StagedConvert, ConvertError> {
    config.validate()?;

    // 1. Decode. Fail fast before any image math runs on garbage.
    if image_bytes.is_empty() {
        return Err(ConvertError::EmptyInput);
    }
    let decoded = image::load_from_memory(image_bytes)?.to_rgb8();

    // 2. Pad so edge-flush structures survive masking.
    let padded = border::pad_white(&decoded, config.border_px);

    // 3 + 4. Shrink and segment, in the configured order. Either way
    // the masks end up at the working resolution.
    let (normalized, scale, masks) = match config.shrink_order {
        ShrinkOrder::ShrinkThenSegment => {
            let (normalized, scale) =
                shrink::shrink_to_working(&padded, config.min_dimension, config.shrink_factor);
            let masks = segment::segment(&normalized);
            (normalized, scale, masks)
        }
        ShrinkOrder::SegmentThenShrink => {
            let masks = segment::segment(&padded);
            let (normalized, scale) =
                shrink::shrink_to_working(&padded, config.min_dimension, config.shrink_factor);
            let masks = masks.resize_to(Dimensions::of(&normalized));
            (normalized, scale, masks)
        }
    };
    let dimensions = Dimensions::of(&normalized);

    // 5. Interior/exterior mask from the external collaborator.
    let boundary_mask = boundary.interior_mask(&normalized)?;

    // 6. Precedence-ordered merge.
    let grid = grid::assemble(&boundary_mask, masks.clone(), dimensions);

    // 7. Physical scale from the door cells.
    let calibration = CalibrationConstants::from_grid(&grid)?;

    Ok(StagedConvert {
        normalized,
        masks,
        boundary: boundary_mask,
        grid,
        calibration,
        dimensions,
        scale,
    })
}
