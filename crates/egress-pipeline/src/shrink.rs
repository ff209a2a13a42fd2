//! Iterative shrink to a simulation-friendly working resolution.
//!
//! Repeatedly resamples the padded floorplan by a fixed factor while
//! both dimensions exceed a minimum-size threshold. The output
//! resolution becomes the coordinate system for every later layer mask
//! and for the assembled grid.
//!
//! Resampling is strictly **nearest-neighbor**: any interpolating
//! filter would blend category colors at symbol boundaries and corrupt
//! the HSV thresholding that follows.

use image::{RgbImage, imageops, imageops::FilterType};

/// Shrink `image` by `factor` per step until either dimension is at or
/// below `min_dimension`.
///
/// Returns the resampled image and the cumulative scale actually
/// applied (output width over input width; 1.0 when no step ran).
///
/// The loop is a no-op when the image already fits within the
/// threshold, and it ends early if a step would not strictly shrink
/// both dimensions, so a misconfigured factor cannot loop forever.
/// Callers validate `factor` up front via
/// [`ConvertConfig::validate`](crate::ConvertConfig::validate).
#[must_use = "returns the shrunk image and the applied scale"]
pub fn shrink_to_working(image: &RgbImage, min_dimension: u32, factor: f32) -> (RgbImage, f64) {
    let original_width = image.width();
    let mut current = image.clone();

    while current.width() > min_dimension && current.height() > min_dimension {
        let next_w = scaled_dimension(current.width(), factor);
        let next_h = scaled_dimension(current.height(), factor);
        if next_w >= current.width() || next_h >= current.height() {
            break;
        }
        current = imageops::resize(&current, next_w, next_h, FilterType::Nearest);
    }

    let scale = f64::from(current.width()) / f64::from(original_width);
    (current, scale)
}

/// One shrink step for a single dimension, clamped to at least one
/// pixel.
fn scaled_dimension(dimension: u32, factor: f32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (f64::from(dimension) * f64::from(factor)).round() as u32;
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn test_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([128, 128, 128]))
    }

    #[test]
    fn no_shrink_when_already_at_threshold() {
        let img = test_image(200, 200);
        let (result, scale) = shrink_to_working(&img, 200, 0.5);
        assert_eq!(result.dimensions(), (200, 200));
        assert!((scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_shrink_when_threshold_exceeds_input() {
        let img = test_image(120, 90);
        let (result, scale) = shrink_to_working(&img, 500, 0.5);
        assert_eq!(result.dimensions(), (120, 90));
        assert!((scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn halving_runs_until_a_dimension_fits() {
        let img = test_image(800, 600);
        let (result, scale) = shrink_to_working(&img, 200, 0.5);
        // 800x600 -> 400x300 -> 200x150, stops with width at threshold.
        assert_eq!(result.dimensions(), (200, 150));
        assert!((scale - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn shorter_dimension_controls_termination() {
        let img = test_image(1000, 210);
        let (result, _) = shrink_to_working(&img, 200, 0.5);
        // One halving drops the height below the threshold.
        assert_eq!(result.dimensions(), (500, 105));
    }

    #[test]
    fn output_never_exceeds_input() {
        let img = test_image(1000, 1000);
        let (result, scale) = shrink_to_working(&img, 150, 0.75);
        assert!(result.width() <= 1000);
        assert!(result.height() <= 1000);
        assert!(result.width() <= 150 || scale < 1.0);
    }

    #[test]
    fn three_quarter_factor_terminates_quickly() {
        // 1000 * 0.75^7 ≈ 133 < 150, so the loop runs at most 7 steps.
        let img = test_image(1000, 1000);
        let (result, _) = shrink_to_working(&img, 150, 0.75);
        assert!(result.width() <= 150);
        assert!(result.width() >= 100, "overshrunk to {}", result.width());
    }

    #[test]
    fn degenerate_factor_cannot_loop_forever() {
        // factor ~1.0 never strictly shrinks, so the guard breaks out.
        let img = test_image(400, 400);
        let (result, scale) = shrink_to_working(&img, 200, 0.999);
        assert!(result.width() <= 400);
        assert!(scale <= 1.0);
    }

    #[test]
    fn scale_reflects_applied_resampling() {
        let img = test_image(400, 400);
        let (result, scale) = shrink_to_working(&img, 150, 0.5);
        // 400 -> 200 -> 100.
        assert_eq!(result.dimensions(), (100, 100));
        assert!((scale - 0.25).abs() < f64::EPSILON);
    }
}
