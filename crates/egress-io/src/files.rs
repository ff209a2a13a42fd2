//! Raster reading and grid/debug-artifact writing.
//!
//! All writes are whole-file overwrites; no partial-write visibility is
//! guaranteed or needed. A conversion that fails writes nothing.

use std::fs;
use std::path::Path;

use egress_export::TextGridError;
use egress_pipeline::{CellAlphabet, SemanticGrid, StagedConvert};
use tracing::debug;

/// Errors from the filesystem boundary.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The offending path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The offending path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The grid could not be serialized.
    #[error("failed to serialize grid: {0}")]
    Serialize(#[from] TextGridError),

    /// A debug image could not be encoded or saved.
    #[error("failed to save image {path}: {source}")]
    Image {
        /// The offending path.
        path: String,
        /// The underlying encoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Read a raster image file as raw bytes.
///
/// The pipeline decodes the bytes itself; this only pulls them off
/// disk, failing fast with the path in the error so a missing or
/// unreadable floorplan never reaches the thresholding stages.
///
/// # Errors
///
/// Returns [`FileError::Read`] when the file is missing or unreadable.
pub fn read_raster(path: &Path) -> Result<Vec<u8>, FileError> {
    fs::read(path).map_err(|source| FileError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Serialize a grid and overwrite `path` with the text form.
///
/// # Errors
///
/// Returns [`FileError::Serialize`] for an ambiguous alphabet and
/// [`FileError::Write`] when the file cannot be written.
pub fn write_grid(
    path: &Path,
    grid: &SemanticGrid,
    alphabet: &CellAlphabet,
) -> Result<(), FileError> {
    let text = egress_export::to_text(grid, alphabet)?;
    fs::write(path, text).map_err(|source| FileError::Write {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), "wrote grid");
    Ok(())
}

/// Write every intermediate stage image into `dir` for inspection.
///
/// Non-load-bearing: these PNGs exist so a surprising grid can be
/// traced back to the mask that produced it.
///
/// # Errors
///
/// Returns [`FileError::Write`] when the directory cannot be created
/// and [`FileError::Image`] when a PNG cannot be saved.
pub fn write_debug_masks(dir: &Path, staged: &StagedConvert) -> Result<(), FileError> {
    fs::create_dir_all(dir).map_err(|source| FileError::Write {
        path: dir.display().to_string(),
        source,
    })?;

    let save_gray = |name: &str, mask: &egress_pipeline::GrayImage| {
        let path = dir.join(name);
        mask.save(&path).map_err(|source| FileError::Image {
            path: path.display().to_string(),
            source,
        })
    };

    let normalized_path = dir.join("normalized.png");
    staged
        .normalized
        .save(&normalized_path)
        .map_err(|source| FileError::Image {
            path: normalized_path.display().to_string(),
            source,
        })?;
    save_gray("walls.png", &staged.masks.walls)?;
    save_gray("windows.png", &staged.masks.windows)?;
    save_gray("doors.png", &staged.masks.doors)?;
    save_gray("obstacles.png", &staged.masks.obstacles)?;
    save_gray("boundary.png", &staged.boundary)?;
    debug!(dir = %dir.display(), "wrote debug masks");
    Ok(())
}
