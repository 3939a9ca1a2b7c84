#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autotiler that classifies every grid cell from its 8-neighborhood.
//!
//! Open cells become [`TileKind::Floor`]. Wall cells are matched against an
//! ordered rule list; the first matching rule wins and cells outside the grid
//! count as walls.

use delve_core::{OpenGrid, TileKind, TileKindGrid};

/// Bit set in a neighborhood mask when the cell above is open.
pub const NORTH: u8 = 1;
/// Bit set when the cell above and to the right is open.
pub const NORTH_EAST: u8 = 2;
/// Bit set when the cell to the right is open.
pub const EAST: u8 = 4;
/// Bit set when the cell below and to the right is open.
pub const SOUTH_EAST: u8 = 8;
/// Bit set when the cell below is open.
pub const SOUTH: u8 = 16;
/// Bit set when the cell below and to the left is open.
pub const SOUTH_WEST: u8 = 32;
/// Bit set when the cell to the left is open.
pub const WEST: u8 = 64;
/// Bit set when the cell above and to the left is open.
pub const NORTH_WEST: u8 = 128;

/// Open/wall state of the eight cells surrounding a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighborhood {
    mask: u8,
}

impl Neighborhood {
    /// Builds a neighborhood from an open-cell bitmask.
    #[must_use]
    pub const fn from_mask(mask: u8) -> Self {
        Self { mask }
    }

    /// Samples the neighbors of a cell, treating out-of-bounds cells as walls.
    #[must_use]
    pub fn from_grid(grid: &OpenGrid, column: i32, row: i32) -> Self {
        const OFFSETS: [(i32, i32, u8); 8] = [
            (0, -1, NORTH),
            (1, -1, NORTH_EAST),
            (1, 0, EAST),
            (1, 1, SOUTH_EAST),
            (0, 1, SOUTH),
            (-1, 1, SOUTH_WEST),
            (-1, 0, WEST),
            (-1, -1, NORTH_WEST),
        ];
        let mask = OFFSETS
            .iter()
            .filter(|(dx, dy, _)| grid.is_open(column + dx, row + dy))
            .fold(0, |mask, (_, _, bit)| mask | bit);
        Self { mask }
    }

    /// Open-cell bitmask of the neighborhood.
    #[must_use]
    pub const fn mask(self) -> u8 {
        self.mask
    }

    const fn open(self, bit: u8) -> bool {
        self.mask & bit != 0
    }

    const fn wall(self, bit: u8) -> bool {
        !self.open(bit)
    }

    const fn wall_corners(self) -> u32 {
        let corners = NORTH_EAST | SOUTH_EAST | SOUTH_WEST | NORTH_WEST;
        (!self.mask & corners).count_ones()
    }
}

/// Classifies a single cell from its own state and its neighborhood.
#[must_use]
pub fn classify_cell(open: bool, around: Neighborhood) -> TileKind {
    if open {
        return TileKind::Floor;
    }

    let tm = around.open(NORTH);
    let bm = around.open(SOUTH);
    let ml = around.open(WEST);
    let mr = around.open(EAST);

    if ml && mr {
        return TileKind::Ceiling;
    }
    if tm && bm {
        return TileKind::Ceiling;
    }
    if !tm && !bm && !ml && mr {
        return TileKind::EdgeLeft;
    }
    if !tm && !bm && ml {
        return TileKind::EdgeRight;
    }
    if !tm && bm && !ml && !mr {
        return TileKind::EdgeTop;
    }
    if tm && !ml && !mr {
        return TileKind::EdgeBottom;
    }

    let wall_corners = around.wall_corners();
    if wall_corners == 1 {
        if around.wall(SOUTH_WEST) {
            return TileKind::StubBottomLeft;
        }
        if around.wall(SOUTH_EAST) {
            return TileKind::StubBottomRight;
        }
        if around.wall(NORTH_EAST) {
            return TileKind::StubTopRight;
        }
        return TileKind::StubTopLeft;
    }
    if ml || mr {
        return TileKind::Ceiling;
    }
    if wall_corners != 3 {
        return TileKind::Ceiling;
    }

    if around.open(SOUTH_EAST) {
        TileKind::CornerTopLeft
    } else if around.open(SOUTH_WEST) {
        TileKind::CornerTopRight
    } else if around.open(NORTH_EAST) {
        TileKind::CornerBottomLeft
    } else if around.open(NORTH_WEST) {
        TileKind::CornerBottomRight
    } else {
        TileKind::Ceiling
    }
}

/// Pure system mapping an [`OpenGrid`] to a [`TileKindGrid`].
#[derive(Debug, Default)]
pub struct TileClassifier;

impl TileClassifier {
    /// Creates a new tile classifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classifies every cell of the grid.
    #[must_use]
    pub fn classify(&self, grid: &OpenGrid) -> TileKindGrid {
        TileKindGrid::from_fn(grid.columns(), grid.rows(), |column, row| {
            classify_cell(
                grid.is_open(column, row),
                Neighborhood::from_grid(grid, column, row),
            )
        })
    }
}
