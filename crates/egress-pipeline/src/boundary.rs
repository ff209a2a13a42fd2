//! Boundary mask provider seam.
//!
//! The interior/exterior mask — which pixels are navigable building
//! interior versus outside the structure — is computed by an external
//! collaborator from the normalized floorplan. This module specifies
//! only the seam: a pluggable provider trait the io layer and tests
//! implement.

use image::{GrayImage, RgbImage};

/// Mask value marking a pixel as building interior.
pub const INTERIOR: u8 = 255;

/// Mask value marking a pixel as outside the building.
pub const EXTERIOR: u8 = 0;

/// An error reported by a boundary mask provider.
///
/// Providers are external (file loaders, separate services), so the
/// failure is carried as a message rather than a typed cause.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BoundaryError(pub String);

/// Supplies the interior/exterior mask for a normalized floorplan.
///
/// The returned mask should be binary — [`INTERIOR`] inside the
/// building, [`EXTERIOR`] outside — and at the resolution of the image
/// it was derived from. The grid assembler reconciles any resolution
/// mismatch by nearest-neighbor resampling, so providers working at a
/// different scale remain usable.
pub trait BoundaryProvider {
    /// Compute (or load) the interior mask for `image`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] when the mask cannot be produced;
    /// conversion of the current floorplan then fails terminally.
    fn interior_mask(&self, image: &RgbImage) -> Result<GrayImage, BoundaryError>;
}

/// Closures can stand in as providers, which keeps tests and simple
/// callers free of wrapper types.
impl<F> BoundaryProvider for F
where
    F: Fn(&RgbImage) -> Result<GrayImage, BoundaryError>,
{
    fn interior_mask(&self, image: &RgbImage) -> Result<GrayImage, BoundaryError> {
        self(image)
    }
}
