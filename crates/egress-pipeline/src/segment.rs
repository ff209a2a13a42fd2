//! Color layer segmentation.
//!
//! Extracts one binary mask per semantic category by thresholding the
//! floorplan in HSV space. The image is converted to HSV exactly once
//! and reused for every category, so repeated segmentation of the same
//! raster is bit-identical.
//!
//! Categories with multiple disjoint ranges (the door's red hue
//! wraparound) OR their per-range masks before filtering. A 3×3 median
//! filter then removes isolated false-positive pixels — speckle from
//! anti-aliased symbol edges — without eroding door or wall
//! connectivity.

use image::{GrayImage, Luma, RgbImage, imageops, imageops::FilterType};
use imageproc::filter::median_filter;

use crate::color::{Category, rgb_to_hsv};
use crate::types::Dimensions;

/// Mask value marking a pixel as inside the category.
///
/// A pixel is in a category iff its filtered mask value equals this
/// marker; every other pixel is forced to [`BACKGROUND`]. The grid
/// assembler relies on this exact contract.
pub const FOREGROUND: u8 = 255;

/// Mask value for pixels outside the category.
pub const BACKGROUND: u8 = 0;

/// Convert a floorplan raster to HSV, stored channelwise in an RGB
/// buffer (`[h, s, v]` per pixel).
#[must_use = "returns the HSV image"]
pub fn to_hsv(image: &RgbImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        image::Rgb(rgb_to_hsv(*image.get_pixel(x, y)))
    })
}

/// Threshold one category out of a pre-converted HSV image.
///
/// Per-range masks are ORed, then median-filtered. A floorplan with no
/// pixels of this category yields a well-formed all-background mask,
/// not an error.
#[must_use = "returns the binary layer mask"]
pub fn category_mask(hsv: &RgbImage, category: Category) -> GrayImage {
    let ranges = category.ranges();
    let raw = GrayImage::from_fn(hsv.width(), hsv.height(), |x, y| {
        let pixel = hsv.get_pixel(x, y).0;
        if ranges.iter().any(|range| range.contains(pixel)) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    });
    median_filter(&raw, 1, 1)
}

/// The four per-category layer masks at one resolution.
///
/// Derived once from a raster, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LayerMasks {
    /// Blue structural walls.
    pub walls: GrayImage,
    /// Green windows.
    pub windows: GrayImage,
    /// Red doors.
    pub doors: GrayImage,
    /// Black obstacles.
    pub obstacles: GrayImage,
}

impl LayerMasks {
    /// Spatial size shared by all four masks.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.walls)
    }

    /// Resample every mask to `target` with nearest-neighbor
    /// interpolation, preserving crisp category boundaries.
    ///
    /// Returns `self` unchanged if already at the target size.
    #[must_use = "returns the resampled masks"]
    pub fn resize_to(self, target: Dimensions) -> Self {
        if self.dimensions() == target {
            return self;
        }
        let resize = |mask: &GrayImage| {
            imageops::resize(mask, target.width, target.height, FilterType::Nearest)
        };
        Self {
            walls: resize(&self.walls),
            windows: resize(&self.windows),
            doors: resize(&self.doors),
            obstacles: resize(&self.obstacles),
        }
    }
}

/// Segment a floorplan raster into its four category layer masks.
///
/// The HSV conversion happens once here and is shared by every
/// category threshold.
#[must_use = "returns the per-category layer masks"]
pub fn segment(image: &RgbImage) -> LayerMasks {
    let hsv = to_hsv(image);
    LayerMasks {
        walls: category_mask(&hsv, Category::Wall),
        windows: category_mask(&hsv, Category::Window),
        doors: category_mask(&hsv, Category::Door),
        obstacles: category_mask(&hsv, Category::Obstacle),
    }
}
