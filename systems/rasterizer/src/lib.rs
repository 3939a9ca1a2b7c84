#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rasterizer that stamps normalized rooms and their hallways onto an open grid.

use delve_core::{Bounds, OpenGrid, Room, HALLWAY_GAP};
use rand::Rng;
use tracing::trace;

/// Strip of open cells carved through the gap between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hallway {
    /// Column of the strip's top-left cell.
    pub x: i32,
    /// Row of the strip's top-left cell.
    pub y: i32,
    /// Width of the strip in cells.
    pub width: u32,
    /// Height of the strip in cells.
    pub height: u32,
    /// Indices of the joined rooms, in the order they were discovered.
    pub rooms: (usize, usize),
}

/// Open grid together with the hallways carved into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Boolean floor grid sized to the normalized bounds.
    pub grid: OpenGrid,
    /// Hallways in carving order.
    pub hallways: Vec<Hallway>,
}

/// Pure system converting a normalized room sequence into an [`OpenGrid`].
#[derive(Debug, Default)]
pub struct Rasterizer;

impl Rasterizer {
    /// Creates a new rasterizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Imprints every room, then carves one hallway per pair of rooms whose
    /// facing walls are [`HALLWAY_GAP`] cells apart and whose perpendicular
    /// extents overlap by at least `hall_width` cells.
    ///
    /// Pairs are visited in sequence order for both rooms, horizontal
    /// adjacency before vertical, and each carved hallway draws its offset
    /// from `rng`.
    pub fn rasterize<R: Rng + ?Sized>(
        &self,
        rooms: &[Room],
        bounds: &Bounds,
        hall_width: u32,
        rng: &mut R,
    ) -> Raster {
        let mut grid = OpenGrid::new(bounds.columns(), bounds.rows());
        for room in rooms {
            grid.open_rect(room.x(), room.y(), room.width(), room.height());
        }

        let hw = hall_width as i32;
        let mut hallways = Vec::new();
        for (i, a) in rooms.iter().enumerate() {
            for (j, b) in rooms.iter().enumerate() {
                if i == j {
                    continue;
                }

                if a.right() + HALLWAY_GAP == b.left() {
                    let (lo, hi) = (a.top().max(b.top()), a.bottom().min(b.bottom()));
                    if hi - lo + 1 >= hw {
                        let start = rng.gen_range(lo..=hi - hw + 1);
                        hallways.push(Hallway {
                            x: a.right() + 1,
                            y: start,
                            width: 1,
                            height: hall_width,
                            rooms: (i, j),
                        });
                    }
                }

                if a.bottom() + HALLWAY_GAP == b.top() {
                    let (lo, hi) = (a.left().max(b.left()), a.right().min(b.right()));
                    if hi - lo + 1 >= hw {
                        let start = rng.gen_range(lo..=hi - hw + 1);
                        hallways.push(Hallway {
                            x: start,
                            y: a.bottom() + 1,
                            width: hall_width,
                            height: 1,
                            rooms: (i, j),
                        });
                    }
                }
            }
        }

        for hallway in &hallways {
            trace!(?hallway, "carving hallway");
            grid.open_rect(hallway.x, hallway.y, hallway.width, hallway.height);
        }

        Raster { grid, hallways }
    }
}
