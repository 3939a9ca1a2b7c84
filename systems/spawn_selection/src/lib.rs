#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn selection that picks the room farthest from the layout's centre.

use delve_core::{grid_to_world, Bounds, Room, SpawnPoint};
use glam::Vec2;
use tracing::debug;

/// Pure system that chooses the player's entry room.
#[derive(Debug, Default)]
pub struct SpawnSelector;

impl SpawnSelector {
    /// Creates a new spawn selector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Picks the room whose midpoint is farthest from the centroid of the
    /// rooms' bounding box and clears its enemy flag in place.
    ///
    /// Ties resolve to the later room. `grid_rows` is the height of the
    /// rasterized grid used by the world-space mapping.
    pub fn select(&self, rooms: &mut [Room], grid_rows: u32) -> Option<SpawnPoint> {
        let centroid = Bounds::enclosing(rooms)?.centroid();

        let mut best: Option<(usize, f32)> = None;
        for (index, room) in rooms.iter().enumerate() {
            let distance = middle_of(room).distance_squared(centroid);
            if best.map_or(true, |(_, farthest)| distance >= farthest) {
                best = Some((index, distance));
            }
        }

        let (index, distance) = best?;
        rooms[index] = rooms[index].without_enemies();
        let room = rooms[index];
        debug!(room = index, distance, "selected spawn room");

        Some(SpawnPoint {
            room: index,
            cell: room.middle(),
            world: grid_to_world(middle_of(&room), grid_rows),
        })
    }
}

fn middle_of(room: &Room) -> Vec2 {
    let (column, row) = room.middle();
    Vec2::new(column as f32, row as f32)
}
