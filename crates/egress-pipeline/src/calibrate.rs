//! Door-size calibration.
//!
//! The simulation has no physical scale of its own: it is derived from
//! the floorplan by measuring the door openings. Door cells are grouped
//! into 4-connected components and the scale constant is the square
//! root of their mean pixel area — door openings are assumed roughly
//! square in the downsampled grid, a deliberate approximation rather
//! than a measurement of any real door's aspect ratio.
//!
//! Every other calibration constant is a linear or integer function of
//! that scale, computed once per conversion and treated as immutable
//! configuration for the lifetime of a simulation run.

use std::collections::HashMap;

use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use serde::{Deserialize, Serialize};

use crate::grid::SemanticGrid;
use crate::segment::BACKGROUND;
use crate::types::ConvertError;

/// Measure the door-size scale constant from a binary door mask.
///
/// Labels 4-connected foreground components, excludes the background
/// from the area statistics, and returns `sqrt(mean(areas))`.
///
/// # Errors
///
/// Returns [`ConvertError::NoDoorComponents`] when the mask has no
/// foreground pixels. A mean over zero components is undefined, and a
/// not-a-number scale would silently poison every derived constant, so
/// the floorplan is rejected instead.
pub fn door_size(doors: &GrayImage) -> Result<f64, ConvertError> {
    let labels = connected_components(doors, Connectivity::Four, Luma([BACKGROUND]));

    let mut areas: HashMap<u32, u64> = HashMap::new();
    for pixel in labels.pixels() {
        let label = pixel.0[0];
        if label != 0 {
            *areas.entry(label).or_insert(0) += 1;
        }
    }

    if areas.is_empty() {
        return Err(ConvertError::NoDoorComponents);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = areas.values().sum::<u64>() as f64 / areas.len() as f64;
    Ok(mean.sqrt())
}

/// Agent mobility states.
///
/// Three distinct states feed three distinct speed multipliers below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mobility {
    /// Unable to move unaided.
    Incapacitated,
    /// Ordinary movement.
    Normal,
    /// Panicked movement.
    Panic,
}

// TODO: all three scales are zero, so every mobility state collapses to
// a speed of zero regardless of door size; confirm the intended
// multipliers with whoever owns the simulation's calibration semantics.
const INCAPACITATED_SPEED_SCALE: f64 = 0.0;
const NORMAL_SPEED_SCALE: f64 = 0.0;
const PANIC_SPEED_SCALE: f64 = 0.0;

impl Mobility {
    /// Door-size-scaled movement speed for this state.
    #[must_use]
    pub fn speed(self, door_size: f64) -> f64 {
        let scale = match self {
            Self::Incapacitated => INCAPACITATED_SPEED_SCALE,
            Self::Normal => NORMAL_SPEED_SCALE,
            Self::Panic => PANIC_SPEED_SCALE,
        };
        scale * door_size
    }
}

/// Scale-derived simulation parameters.
///
/// Constructed once by the calibrator and handed to the simulation
/// engine's initialization; never read from ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConstants {
    /// Physical scale unit: mean door width in grid cells.
    pub door_size: f64,
    /// Human agent maximum speed, `2 × door_size`.
    pub max_speed: f64,
    /// Whole-cell speed limit used by the movement scheduler,
    /// `int(2 × door_size)`.
    pub grid_speed_limit: u32,
    /// Smoke radius in cells, `int(door_size)`.
    pub smoke_radius: u32,
    /// Smoke spread rate, `⌊door_size / 4⌋`.
    pub smoke_spread_rate: u32,
    /// Smoke spread threshold, `5 × int(door_size)`.
    pub smoke_spread_threshold: u32,
}

impl CalibrationConstants {
    /// Derive every constant from the door-size scale.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_door_size(door_size: f64) -> Self {
        let whole = door_size.floor() as u32;
        Self {
            door_size,
            max_speed: 2.0 * door_size,
            grid_speed_limit: (2.0 * door_size).floor() as u32,
            smoke_radius: whole,
            smoke_spread_rate: (door_size / 4.0).floor() as u32,
            smoke_spread_threshold: 5 * whole,
        }
    }

    /// Calibrate from an assembled grid's door cells.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NoDoorComponents`] when the grid has no
    /// door cells.
    pub fn from_grid(grid: &SemanticGrid) -> Result<Self, ConvertError> {
        door_size(&grid.door_mask()).map(Self::from_door_size)
    }
}
