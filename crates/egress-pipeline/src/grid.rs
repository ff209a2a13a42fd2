//! Symbolic grid assembly.
//!
//! Merges the boundary mask and the four category layer masks into one
//! grid of mutually exclusive cell categories, one cell per
//! working-resolution pixel.
//!
//! Cells start as free interior space and are overwritten in a fixed
//! precedence order, later writes winning ties: exterior, then wall,
//! then door, then obstacle, then window. Windows re-mark their cells
//! as free space — window framing often overlaps wall-colored pixels,
//! so the window layer deliberately overrides any earlier wall or door
//! classification at the same cell. Net precedence: obstacle beats door
//! beats wall beats exterior beats the default, and window beats
//! everything by being applied last.

use image::{GrayImage, imageops, imageops::FilterType};
use serde::{Deserialize, Serialize};

use crate::boundary::EXTERIOR;
use crate::segment::{FOREGROUND, LayerMasks};
use crate::types::Dimensions;

/// One grid cell's category. Mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Navigable interior space.
    Free,
    /// Outside the building; unreachable.
    Exterior,
    /// Structural wall.
    Wall,
    /// Door (or exit, depending on the alphabet in use).
    Door,
    /// Furniture or other obstacle.
    Obstacle,
}

impl Cell {
    /// Every cell category.
    pub const ALL: [Self; 5] = [
        Self::Free,
        Self::Exterior,
        Self::Wall,
        Self::Door,
        Self::Obstacle,
    ];
}

/// Single-character codes for serialized grid cells.
///
/// The door code is the variant point: historical pipelines disagree on
/// whether a door cell doubles as a simulation exit, so the mapping is
/// configuration rather than two parallel pipelines. The five codes
/// must be pairwise distinct or the serialized grid would be ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAlphabet {
    /// Free interior space.
    pub free: char,
    /// Outside the building.
    pub exterior: char,
    /// Wall.
    pub wall: char,
    /// Door.
    pub door: char,
    /// Obstacle / furniture.
    pub obstacle: char,
}

impl Default for CellAlphabet {
    fn default() -> Self {
        Self::plain_doors()
    }
}

impl CellAlphabet {
    /// Doors are plain doors (`D`).
    #[must_use]
    pub const fn plain_doors() -> Self {
        Self {
            free: 'E',
            exterior: '_',
            wall: 'W',
            door: 'D',
            obstacle: 'F',
        }
    }

    /// Doors double as simulation exits (`E`); free space moves to `.`
    /// to keep the codes distinct.
    #[must_use]
    pub const fn exit_doors() -> Self {
        Self {
            free: '.',
            exterior: '_',
            wall: 'W',
            door: 'E',
            obstacle: 'F',
        }
    }

    /// The code for one cell category.
    #[must_use]
    pub const fn encode(&self, cell: Cell) -> char {
        match cell {
            Cell::Free => self.free,
            Cell::Exterior => self.exterior,
            Cell::Wall => self.wall,
            Cell::Door => self.door,
            Cell::Obstacle => self.obstacle,
        }
    }

    /// The cell category for one code, if it belongs to this alphabet.
    #[must_use]
    pub fn decode(&self, code: char) -> Option<Cell> {
        Cell::ALL.into_iter().find(|&cell| self.encode(cell) == code)
    }

    /// Check that the five codes are pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns a description of the clash when two categories share a
    /// code.
    pub fn validate(&self) -> Result<(), String> {
        for (i, &a) in Cell::ALL.iter().enumerate() {
            for &b in &Cell::ALL[i + 1..] {
                if self.encode(a) == self.encode(b) {
                    return Err(format!(
                        "cell categories {a:?} and {b:?} share the code '{}'",
                        self.encode(a),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// The discretized floorplan: a dense 2-D array of cell categories.
///
/// Row 0 is the top image row; `(x, y)` addresses column `x` of row
/// `y`. The simulation loader applies its own quarter-turn on load, so
/// no rotation happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl SemanticGrid {
    /// A grid of `dimensions` with every cell set to `fill`.
    #[must_use]
    pub fn filled(dimensions: Dimensions, fill: Cell) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
            cells: vec![fill; dimensions.width as usize * dimensions.height as usize],
        }
    }

    /// Rebuild a grid from parsed cells.
    ///
    /// Returns `None` when the cell count does not match
    /// `width × height`.
    #[must_use]
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Grid size as [`Dimensions`].
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// The cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Cell {
        self.cells[self.index(x, y)]
    }

    fn set(&mut self, x: u32, y: u32, cell: Cell) {
        let index = self.index(x, y);
        self.cells[index] = cell;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// All cells in row-major order (top row first).
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells with the given category.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Binary image of the door cells (255 where `Cell::Door`), the
    /// calibrator's input.
    #[must_use]
    pub fn door_mask(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) == Cell::Door {
                image::Luma([FOREGROUND])
            } else {
                image::Luma([0])
            }
        })
    }
}

/// Merge the boundary mask and category layer masks into a grid at
/// `target` resolution.
///
/// Masks at a different resolution — possible when segmentation ran
/// before the shrink loop — are reconciled by nearest-neighbor
/// resampling before the merge, never by silent cropping or padding.
///
/// Overwrite order is the contract documented at module level.
#[must_use = "returns the assembled grid"]
pub fn assemble(boundary: &GrayImage, masks: LayerMasks, target: Dimensions) -> SemanticGrid {
    let masks = masks.resize_to(target);
    let boundary = reconcile(boundary, target);

    let mut grid = SemanticGrid::filled(target, Cell::Free);

    for y in 0..target.height {
        for x in 0..target.width {
            if boundary.get_pixel(x, y).0[0] == EXTERIOR {
                grid.set(x, y, Cell::Exterior);
            }
        }
    }
    overwrite(&mut grid, &masks.walls, Cell::Wall);
    overwrite(&mut grid, &masks.doors, Cell::Door);
    overwrite(&mut grid, &masks.obstacles, Cell::Obstacle);
    // Windows last: visually detected, but passable space.
    overwrite(&mut grid, &masks.windows, Cell::Free);

    grid
}

/// Set `cell` wherever `mask` is foreground.
fn overwrite(grid: &mut SemanticGrid, mask: &GrayImage, cell: Cell) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if mask.get_pixel(x, y).0[0] == FOREGROUND {
                grid.set(x, y, cell);
            }
        }
    }
}

/// Nearest-neighbor resample of the boundary mask when its resolution
/// does not match the target.
fn reconcile(boundary: &GrayImage, target: Dimensions) -> GrayImage {
    if Dimensions::of(boundary) == target {
        boundary.clone()
    } else {
        imageops::resize(boundary, target.width, target.height, FilterType::Nearest)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::boundary::INTERIOR;
    use crate::segment::BACKGROUND;
    use image::Luma;

    const DIMS: Dimensions = Dimensions {
        width: 6,
        height: 4,
    };

    fn blank_mask() -> GrayImage {
        GrayImage::from_pixel(DIMS.width, DIMS.height, Luma([BACKGROUND]))
    }

    fn interior_everywhere() -> GrayImage {
        GrayImage::from_pixel(DIMS.width, DIMS.height, Luma([INTERIOR]))
    }

    fn mask_with(pixels: &[(u32, u32)]) -> GrayImage {
        let mut mask = blank_mask();
        for &(x, y) in pixels {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
        mask
    }

    fn masks(
        walls: GrayImage,
        windows: GrayImage,
        doors: GrayImage,
        obstacles: GrayImage,
    ) -> LayerMasks {
        LayerMasks {
            walls,
            windows,
            doors,
            obstacles,
        }
    }

    #[test]
    fn default_alphabet_codes() {
        let alphabet = CellAlphabet::default();
        assert_eq!(alphabet.encode(Cell::Free), 'E');
        assert_eq!(alphabet.encode(Cell::Exterior), '_');
        assert_eq!(alphabet.encode(Cell::Wall), 'W');
        assert_eq!(alphabet.encode(Cell::Door), 'D');
        assert_eq!(alphabet.encode(Cell::Obstacle), 'F');
        alphabet.validate().unwrap();
    }

    #[test]
    fn exit_alphabet_is_valid_and_codes_doors_as_exits() {
        let alphabet = CellAlphabet::exit_doors();
        assert_eq!(alphabet.encode(Cell::Door), 'E');
        assert_eq!(alphabet.encode(Cell::Free), '.');
        alphabet.validate().unwrap();
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let alphabet = CellAlphabet {
            door: 'W',
            ..CellAlphabet::default()
        };
        let err = alphabet.validate().unwrap_err();
        assert!(err.contains('W'), "unexpected message: {err}");
    }

    #[test]
    fn decode_inverts_encode() {
        let alphabet = CellAlphabet::default();
        for cell in Cell::ALL {
            assert_eq!(alphabet.decode(alphabet.encode(cell)), Some(cell));
        }
        assert_eq!(alphabet.decode('?'), None);
    }

    #[test]
    fn empty_masks_give_all_free_grid() {
        let grid = assemble(
            &interior_everywhere(),
            masks(blank_mask(), blank_mask(), blank_mask(), blank_mask()),
            DIMS,
        );
        assert_eq!(grid.count(Cell::Free), 24);
    }

    #[test]
    fn exterior_cells_come_from_the_boundary_mask() {
        let mut boundary = interior_everywhere();
        boundary.put_pixel(0, 0, Luma([EXTERIOR]));
        boundary.put_pixel(5, 3, Luma([EXTERIOR]));
        let grid = assemble(
            &boundary,
            masks(blank_mask(), blank_mask(), blank_mask(), blank_mask()),
            DIMS,
        );
        assert_eq!(grid.get(0, 0), Cell::Exterior);
        assert_eq!(grid.get(5, 3), Cell::Exterior);
        assert_eq!(grid.get(2, 2), Cell::Free);
    }

    #[test]
    fn door_beats_wall_at_the_same_cell() {
        let grid = assemble(
            &interior_everywhere(),
            masks(
                mask_with(&[(1, 1)]),
                blank_mask(),
                mask_with(&[(1, 1)]),
                blank_mask(),
            ),
            DIMS,
        );
        assert_eq!(grid.get(1, 1), Cell::Door);
    }

    #[test]
    fn obstacle_beats_door() {
        let grid = assemble(
            &interior_everywhere(),
            masks(
                blank_mask(),
                blank_mask(),
                mask_with(&[(2, 2)]),
                mask_with(&[(2, 2)]),
            ),
            DIMS,
        );
        assert_eq!(grid.get(2, 2), Cell::Obstacle);
    }

    #[test]
    fn window_beats_everything_and_resolves_to_free() {
        let everything = [(3, 1)];
        let grid = assemble(
            &interior_everywhere(),
            masks(
                mask_with(&everything),
                mask_with(&everything),
                mask_with(&everything),
                mask_with(&everything),
            ),
            DIMS,
        );
        assert_eq!(grid.get(3, 1), Cell::Free);
    }

    #[test]
    fn wall_beats_exterior_at_the_same_cell() {
        // Overwrite order: exterior first, wall second, so a cell both
        // outside the boundary and wall-masked resolves to wall.
        let mut boundary = interior_everywhere();
        boundary.put_pixel(4, 2, Luma([EXTERIOR]));
        let grid = assemble(
            &boundary,
            masks(mask_with(&[(4, 2)]), blank_mask(), blank_mask(), blank_mask()),
            DIMS,
        );
        assert_eq!(grid.get(4, 2), Cell::Wall);
    }

    #[test]
    fn mismatched_boundary_resolution_is_resampled() {
        // Boundary at double resolution: left half exterior.
        let boundary = GrayImage::from_fn(12, 8, |x, _| {
            if x < 6 {
                Luma([EXTERIOR])
            } else {
                Luma([INTERIOR])
            }
        });
        let grid = assemble(
            &boundary,
            masks(blank_mask(), blank_mask(), blank_mask(), blank_mask()),
            DIMS,
        );
        assert_eq!(grid.get(0, 0), Cell::Exterior);
        assert_eq!(grid.get(2, 0), Cell::Exterior);
        assert_eq!(grid.get(3, 0), Cell::Free);
        assert_eq!(grid.get(5, 3), Cell::Free);
    }

    #[test]
    fn door_mask_round_trips_door_cells() {
        let grid = assemble(
            &interior_everywhere(),
            masks(
                blank_mask(),
                blank_mask(),
                mask_with(&[(1, 1), (2, 1)]),
                blank_mask(),
            ),
            DIMS,
        );
        let doors = grid.door_mask();
        assert_eq!(doors.get_pixel(1, 1).0[0], FOREGROUND);
        assert_eq!(doors.get_pixel(2, 1).0[0], FOREGROUND);
        assert_eq!(doors.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn from_cells_checks_the_cell_count() {
        assert!(SemanticGrid::from_cells(2, 2, vec![Cell::Free; 4]).is_some());
        assert!(SemanticGrid::from_cells(2, 2, vec![Cell::Free; 3]).is_none());
    }
}
