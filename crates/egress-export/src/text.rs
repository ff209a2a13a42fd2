//! Grid text format serializer.
//!
//! One line per grid row, cells as whitespace-separated
//! single-character codes from a [`CellAlphabet`]. Rows are written top
//! to bottom as the source image is oriented; the simulation engine's
//! loader applies its own quarter-turn on load so the file reads the
//! way the floorplan is drawn.
//!
//! This file is the sole contract with the simulation engine's
//! floorplan loader. Parsing is the exact inverse of serialization:
//! a round trip reproduces the grid character for character.
//!
//! This is a pure module with no I/O -- it returns a `String`.

use egress_pipeline::{Cell, CellAlphabet, SemanticGrid};

/// Errors from grid text serialization or parsing.
#[derive(Debug, thiserror::Error)]
pub enum TextGridError {
    /// The alphabet maps two categories to one code; the text form
    /// would be ambiguous.
    #[error("cell alphabet is ambiguous: {0}")]
    InvalidAlphabet(String),

    /// The document has no cell rows at all.
    #[error("grid text is empty")]
    Empty,

    /// A row's cell count differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// 1-based row number in the document.
        row: usize,
        /// Cell count of the first row.
        expected: usize,
        /// Cell count found in this row.
        found: usize,
    },

    /// A token is not a single character of the alphabet.
    #[error("unknown cell code {code:?} at row {row}, column {column}")]
    UnknownCode {
        /// The offending token.
        code: String,
        /// 1-based row number.
        row: usize,
        /// 1-based column number.
        column: usize,
    },

    /// The document describes a grid too large to represent.
    #[error("grid of {rows} rows by {columns} columns exceeds the representable size")]
    Oversized {
        /// Parsed row count.
        rows: usize,
        /// Parsed column count.
        columns: usize,
    },
}

/// Serialize a grid to the simulation engine's text format.
///
/// # Errors
///
/// Returns [`TextGridError::InvalidAlphabet`] when the alphabet's codes
/// are not pairwise distinct.
pub fn to_text(grid: &SemanticGrid, alphabet: &CellAlphabet) -> Result<String, TextGridError> {
    alphabet.validate().map_err(TextGridError::InvalidAlphabet)?;

    let width = grid.width() as usize;
    let mut out = String::with_capacity(grid.cells().len() * 2 + grid.height() as usize);
    for row in grid.cells().chunks(width.max(1)) {
        for (i, &cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(alphabet.encode(cell));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Parse the text format back into a grid.
///
/// Accepts exactly what [`to_text`] produces, plus any amount of
/// whitespace between cells. Blank lines end the document.
///
/// # Errors
///
/// Returns [`TextGridError::InvalidAlphabet`] for an ambiguous
/// alphabet, [`TextGridError::Empty`] for a document without rows,
/// [`TextGridError::RaggedRow`] when row lengths disagree,
/// [`TextGridError::UnknownCode`] for tokens outside the alphabet, and
/// [`TextGridError::Oversized`] when the dimensions cannot be
/// represented.
pub fn parse_text(text: &str, alphabet: &CellAlphabet) -> Result<SemanticGrid, TextGridError> {
    alphabet.validate().map_err(TextGridError::InvalidAlphabet)?;

    let mut cells: Vec<Cell> = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0_usize;

    for (row_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            break;
        }
        let row_number = row_index + 1;
        let mut row_cells = 0_usize;
        for (column_index, token) in line.split_whitespace().enumerate() {
            let cell = decode_token(token, alphabet, row_number, column_index + 1)?;
            cells.push(cell);
            row_cells += 1;
        }
        match width {
            None => width = Some(row_cells),
            Some(expected) if expected != row_cells => {
                return Err(TextGridError::RaggedRow {
                    row: row_number,
                    expected,
                    found: row_cells,
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let Some(columns) = width else {
        return Err(TextGridError::Empty);
    };

    let oversized = TextGridError::Oversized { rows, columns };
    let (Ok(grid_width), Ok(grid_height)) = (u32::try_from(columns), u32::try_from(rows)) else {
        return Err(oversized);
    };
    SemanticGrid::from_cells(grid_width, grid_height, cells).ok_or(oversized)
}

fn decode_token(
    token: &str,
    alphabet: &CellAlphabet,
    row: usize,
    column: usize,
) -> Result<Cell, TextGridError> {
    let mut chars = token.chars();
    let (Some(code), None) = (chars.next(), chars.next()) else {
        return Err(TextGridError::UnknownCode {
            code: token.to_owned(),
            row,
            column,
        });
    };
    alphabet.decode(code).ok_or_else(|| TextGridError::UnknownCode {
        code: token.to_owned(),
        row,
        column,
    })
}
