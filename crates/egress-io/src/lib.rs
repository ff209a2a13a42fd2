//! egress-io: Filesystem and network boundary for egress.
//!
//! Everything the sans-IO crates refuse to do lives here: reading the
//! combined floorplan raster, writing the serialized grid and debug
//! artifacts, loading prerendered boundary masks, and the HTTP call
//! that triggers the upstream image-to-image generator.

pub mod boundary;
pub mod files;
pub mod generator;

pub use boundary::{AllInterior, MaskFile};
pub use files::{FileError, read_raster, write_debug_masks, write_grid};
pub use generator::{GeneratorClient, GeneratorError};
