use std::collections::VecDeque;

use delve_core::{OpenGrid, Room, Settings};
use delve_system_bounds::BoundsNormalizer;
use delve_system_rasterizer::{Raster, Rasterizer};
use delve_system_room_graph::RoomGraphBuilder;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn build(settings: &Settings, seed: u64) -> (Vec<Room>, Raster) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (mut rooms, _) = RoomGraphBuilder::new().grow(settings, &mut rng).into_parts();
    let bounds = BoundsNormalizer::new()
        .normalize(&mut rooms)
        .expect("growth always yields the root");
    let raster = Rasterizer::new().rasterize(&rooms, &bounds, settings.hall_width(), &mut rng);
    (rooms, raster)
}

fn reachable_from(grid: &OpenGrid, start: (i32, i32)) -> Vec<bool> {
    let columns = grid.columns() as i32;
    let mut seen = vec![false; grid.columns() as usize * grid.rows() as usize];
    let mut queue = VecDeque::from([start]);
    seen[(start.1 * columns + start.0) as usize] = true;

    while let Some((column, row)) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (column + dx, row + dy);
            if !grid.is_open(next.0, next.1) {
                continue;
            }
            let index = (next.1 * columns + next.0) as usize;
            if !seen[index] {
                seen[index] = true;
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn two_square_rooms_join_through_a_three_cell_hallway() {
    let settings = Settings::new(5, 5, 1, 3, 0).expect("valid settings");
    let (rooms, raster) = build(&settings, 2024);

    assert_eq!(rooms.len(), 2);
    assert_eq!(raster.hallways.len(), 1);
    let hallway = raster.hallways[0];
    assert_eq!(hallway.width.max(hallway.height), 3);
    assert_eq!(hallway.width.min(hallway.height), 1);
    assert_eq!(raster.grid.open_count(), 53);
}

#[test]
fn raster_is_deterministic_per_seed() {
    let settings = Settings::new(3, 8, 20, 2, 0).expect("valid settings");
    assert_eq!(build(&settings, 99), build(&settings, 99));
}

#[test]
fn every_tree_link_is_carved() {
    let settings = Settings::new(3, 7, 24, 2, 0).expect("valid settings");
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let graph = RoomGraphBuilder::new().grow(&settings, &mut rng);
    let links = graph.links().to_vec();
    let (mut rooms, _) = graph.into_parts();
    let bounds = BoundsNormalizer::new()
        .normalize(&mut rooms)
        .expect("rooms present");
    let raster = Rasterizer::new().rasterize(&rooms, &bounds, settings.hall_width(), &mut rng);

    for link in links {
        let joined = raster.hallways.iter().any(|hallway| {
            hallway.rooms == (link.parent, link.child) || hallway.rooms == (link.child, link.parent)
        });
        assert!(joined, "link {link:?} has no hallway");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_room_is_reachable_from_the_root(
        seed in any::<u64>(),
        room_count in 0u32..40,
        min in 1u32..5,
        extra in 0u32..5,
    ) {
        let settings = Settings::new(min, min + extra, room_count, 1, 0).expect("valid settings");
        let (rooms, raster) = build(&settings, seed);
        let columns = raster.grid.columns() as i32;
        let seen = reachable_from(&raster.grid, rooms[0].middle());

        for room in &rooms {
            let (column, row) = room.middle();
            prop_assert!(seen[(row * columns + column) as usize], "{room:?} unreachable");
        }
    }
}
