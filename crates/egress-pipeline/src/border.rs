//! White margin padding.
//!
//! Adds a fixed-width solid white border on all four sides of the
//! floorplan before any masking. Structures drawn flush against the
//! image edge would otherwise be clipped by boundary detection, and
//! door regions touching the edge could lose connectivity.
//!
//! This is the first processing step after decode.

use image::{Rgb, RgbImage, imageops};

/// The padding color. White reads as background in every category
/// threshold, so the margin never contributes to any layer mask.
pub const PAD_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Pad an image with a solid white margin of `border_px` on every side.
///
/// A zero border returns a copy of the input unchanged.
#[must_use = "returns the padded image"]
pub fn pad_white(image: &RgbImage, border_px: u32) -> RgbImage {
    if border_px == 0 {
        return image.clone();
    }

    let mut padded = RgbImage::from_pixel(
        image.width() + 2 * border_px,
        image.height() + 2 * border_px,
        PAD_COLOR,
    );
    imageops::replace(&mut padded, image, i64::from(border_px), i64::from(border_px));
    padded
}
