#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounds normalization that shifts a room set into non-negative grid space.

use delve_core::{Bounds, Room};

/// Pure system that translates rooms so their bounding box starts at `(0, 0)`.
#[derive(Debug, Default)]
pub struct BoundsNormalizer;

impl BoundsNormalizer {
    /// Creates a new bounds normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Shifts every room by the negated minimum corner of the room set and
    /// returns the normalized bounds, whose extent is the grid size.
    ///
    /// Returns `None` and leaves nothing to shift when `rooms` is empty.
    pub fn normalize(&self, rooms: &mut [Room]) -> Option<Bounds> {
        let bounds = Bounds::enclosing(rooms)?;
        let (dx, dy) = (-bounds.min_x(), -bounds.min_y());
        for room in rooms.iter_mut() {
            *room = room.translated(dx, dy);
        }
        Bounds::enclosing(rooms)
    }
}
