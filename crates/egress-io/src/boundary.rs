//! File-backed boundary mask providers.
//!
//! Implements the pipeline's [`BoundaryProvider`] seam for the two ways
//! a conversion actually runs: with a prerendered mask image from the
//! external interior/exterior routine, or without one at all.

use std::path::PathBuf;

use egress_pipeline::boundary::{BoundaryError, BoundaryProvider, EXTERIOR, INTERIOR};
use egress_pipeline::{GrayImage, RgbImage};
use image::Luma;

/// Loads a prerendered interior/exterior mask image from disk.
///
/// The mask is converted to grayscale and binarized at mid-gray:
/// pixels at 128 and above read as interior. Resolution may differ
/// from the normalized floorplan; the grid assembler reconciles that
/// by nearest-neighbor resampling.
#[derive(Debug, Clone)]
pub struct MaskFile {
    path: PathBuf,
}

impl MaskFile {
    /// Provider backed by the mask image at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BoundaryProvider for MaskFile {
    fn interior_mask(&self, _image: &RgbImage) -> Result<GrayImage, BoundaryError> {
        let mask = image::open(&self.path)
            .map_err(|err| {
                BoundaryError(format!(
                    "reading boundary mask {}: {err}",
                    self.path.display(),
                ))
            })?
            .to_luma8();

        Ok(GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
            if mask.get_pixel(x, y).0[0] >= 128 {
                Luma([INTERIOR])
            } else {
                Luma([EXTERIOR])
            }
        }))
    }
}

/// Treats every pixel as building interior.
///
/// Stand-in for runs where the external boundary routine is
/// unavailable; exterior cells then simply never occur.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllInterior;

impl BoundaryProvider for AllInterior {
    fn interior_mask(&self, image: &RgbImage) -> Result<GrayImage, BoundaryError> {
        Ok(GrayImage::from_pixel(
            image.width(),
            image.height(),
            Luma([INTERIOR]),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn test_output_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test-output")
            .join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn all_interior_matches_the_image_size() {
        let img = RgbImage::new(9, 5);
        let mask = AllInterior.interior_mask(&img).unwrap();
        assert_eq!(mask.dimensions(), (9, 5));
        assert!(mask.pixels().all(|p| p.0[0] == INTERIOR));
    }

    #[test]
    fn mask_file_binarizes_at_mid_gray() {
        let path = test_output_dir("boundary").join("mask.png");
        let mask = GrayImage::from_fn(4, 1, |x, _| match x {
            0 => Luma([0]),
            1 => Luma([127]),
            2 => Luma([128]),
            _ => Luma([255]),
        });
        mask.save(&path).unwrap();

        let provider = MaskFile::new(&path);
        let loaded = provider.interior_mask(&RgbImage::new(4, 1)).unwrap();
        assert_eq!(loaded.get_pixel(0, 0).0[0], EXTERIOR);
        assert_eq!(loaded.get_pixel(1, 0).0[0], EXTERIOR);
        assert_eq!(loaded.get_pixel(2, 0).0[0], INTERIOR);
        assert_eq!(loaded.get_pixel(3, 0).0[0], INTERIOR);
    }

    #[test]
    fn missing_mask_file_reports_its_path() {
        let provider = MaskFile::new("no/such/mask.png");
        let err = provider.interior_mask(&RgbImage::new(2, 2)).unwrap_err();
        assert!(err.to_string().contains("no/such/mask.png"));
    }
}
