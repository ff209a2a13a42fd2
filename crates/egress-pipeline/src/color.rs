//! Hue-saturation-value conversion and the fixed category color ranges.
//!
//! The upstream symbol convention encodes structure as color: walls are
//! blue, windows green, doors red, obstacles black. Thresholds are
//! expressed in the OpenCV 8-bit HSV convention — hue in half-degrees
//! (0..=180), saturation and value in 0..=255 — and the conversion here
//! reproduces that convention so the constants keep their meaning.

use image::Rgb;

/// Convert one RGB pixel to OpenCV-convention HSV.
///
/// Returns `[h, s, v]` with hue in half-degrees (0..=180) and
/// saturation/value in 0..=255. Achromatic pixels (zero chroma) get
/// hue and saturation 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0;
    let value = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = value - min;

    if chroma == 0 {
        return [0, 0, value];
    }

    let saturation = (255.0 * f32::from(chroma) / f32::from(value)).round() as u8;

    let chroma_f = f32::from(chroma);
    let mut hue_degrees = if value == r {
        60.0 * (f32::from(g) - f32::from(b)) / chroma_f
    } else if value == g {
        120.0 + 60.0 * (f32::from(b) - f32::from(r)) / chroma_f
    } else {
        240.0 + 60.0 * (f32::from(r) - f32::from(g)) / chroma_f
    };
    if hue_degrees < 0.0 {
        hue_degrees += 360.0;
    }

    let hue = (hue_degrees / 2.0).round() as u8;
    [hue, saturation, value]
}

/// An inclusive lower/upper bound pair in HSV space defining one
/// semantic category's admissible pixel colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    /// Inclusive lower bound, `[h, s, v]`.
    pub lower: [u8; 3],
    /// Inclusive upper bound, `[h, s, v]`.
    pub upper: [u8; 3],
}

impl HsvRange {
    /// Create a range from inclusive bounds.
    #[must_use]
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Componentwise inclusive containment test.
    #[must_use]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Walls are drawn in blue.
pub const WALL_BLUE: HsvRange = HsvRange::new([80, 50, 50], [150, 255, 255]);

/// Windows are drawn in green.
pub const WINDOW_GREEN: HsvRange = HsvRange::new([35, 50, 50], [85, 255, 255]);

/// Doors are drawn in red; red wraps the hue origin, so it splits into
/// two sub-ranges combined with OR at segmentation time.
pub const DOOR_RED_LOW: HsvRange = HsvRange::new([0, 50, 50], [20, 255, 255]);
/// Upper half of the red hue wraparound.
pub const DOOR_RED_HIGH: HsvRange = HsvRange::new([150, 50, 50], [180, 255, 255]);

/// Obstacles are drawn in pure black.
pub const OBSTACLE_BLACK: HsvRange = HsvRange::new([0, 0, 0], [0, 0, 0]);

/// The fixed semantic categories extracted from a floorplan raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Structural walls (blue).
    Wall,
    /// Windows (green); visually detected but passable.
    Window,
    /// Doors (red, wraparound hue).
    Door,
    /// Furniture and other obstacles (black).
    Obstacle,
}

impl Category {
    /// All categories, in segmentation order.
    pub const ALL: [Self; 4] = [Self::Wall, Self::Window, Self::Door, Self::Obstacle];

    /// The HSV range set admitting this category's pixels.
    #[must_use]
    pub const fn ranges(self) -> &'static [HsvRange] {
        match self {
            Self::Wall => &[WALL_BLUE],
            Self::Window => &[WINDOW_GREEN],
            Self::Door => &[DOOR_RED_LOW, DOOR_RED_HIGH],
            Self::Obstacle => &[OBSTACLE_BLACK],
        }
    }
}
