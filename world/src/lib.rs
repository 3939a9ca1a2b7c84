#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative dungeon state for Delve.
//!
//! The world owns the current layout and the random stream that produced it.
//! Regeneration runs every generation system in a fixed order against local
//! state and publishes the finished layout with a single assignment, so
//! queries never observe a half-built dungeon.

use std::convert::Infallible;

use delve_core::{
    Command, Event, OpenGrid, PopulationCallbacks, Room, Settings, SpawnPoint, TileKindGrid,
};
use delve_system_autotile::TileClassifier;
use delve_system_bounds::BoundsNormalizer;
use delve_system_population::{PopulationPlanner, PopulationReport};
use delve_system_rasterizer::{Hallway, Rasterizer};
use delve_system_room_graph::{RoomGraphBuilder, RoomLink};
use delve_system_spawn_selection::SpawnSelector;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

/// Fully built dungeon layout.
#[derive(Clone, Debug)]
pub struct Layout {
    settings: Settings,
    seed: u64,
    rooms: Vec<Room>,
    links: Vec<RoomLink>,
    hallways: Vec<Hallway>,
    open: OpenGrid,
    tiles: TileKindGrid,
    spawn: SpawnPoint,
}

impl Layout {
    /// Settings the layout was generated from.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Seed the layout was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Normalized rooms in creation order, including enemy flags.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Growth tree edges.
    #[must_use]
    pub fn links(&self) -> &[RoomLink] {
        &self.links
    }

    /// Carved hallways in carving order.
    #[must_use]
    pub fn hallways(&self) -> &[Hallway] {
        &self.hallways
    }

    /// Boolean floor grid.
    #[must_use]
    pub fn open_grid(&self) -> &OpenGrid {
        &self.open
    }

    /// Classified tile grid.
    #[must_use]
    pub fn tiles(&self) -> &TileKindGrid {
        &self.tiles
    }

    /// Player entry point.
    #[must_use]
    pub const fn spawn(&self) -> SpawnPoint {
        self.spawn
    }
}

/// Represents the authoritative dungeon state.
#[derive(Debug)]
pub struct Dungeon {
    layout: Option<Layout>,
    rng: ChaCha8Rng,
    generation: u64,
}

impl Dungeon {
    /// Creates a dungeon that has not generated a layout yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: None,
            rng: ChaCha8Rng::seed_from_u64(0),
            generation: 0,
        }
    }
}

impl Default for Dungeon {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the dungeon, mutating state deterministically.
pub fn apply(dungeon: &mut Dungeon, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Regenerate { settings, seed } => {
            let accepted = try_regenerate(
                dungeon,
                settings,
                seed,
                |_| Ok::<(), Infallible>(()),
                out_events,
            );
            match accepted {
                Ok(()) => {}
                Err(never) => match never {},
            }
        }
    }
}

/// Builds a new layout and publishes it only when `accept` approves its tiles.
///
/// On rejection the previous layout, random stream and generation counter are
/// left untouched, no events are emitted and the error is returned.
pub fn try_regenerate<E>(
    dungeon: &mut Dungeon,
    settings: Settings,
    seed: u64,
    accept: impl FnOnce(&TileKindGrid) -> Result<(), E>,
    out_events: &mut Vec<Event>,
) -> Result<(), E> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let graph = RoomGraphBuilder::new().grow(&settings, &mut rng);
    let generated = graph.branch_count();
    let (mut rooms, links) = graph.into_parts();

    let bounds = BoundsNormalizer::new()
        .normalize(&mut rooms)
        .expect("room growth always places the root room");
    let raster = Rasterizer::new().rasterize(&rooms, &bounds, settings.hall_width(), &mut rng);
    let tiles = TileClassifier::new().classify(&raster.grid);

    accept(&tiles)?;

    let spawn = SpawnSelector::new()
        .select(&mut rooms, raster.grid.rows())
        .expect("room growth always places the root room");

    let mut events = Vec::with_capacity(2);
    events.extend(growth_truncation(&settings, generated));

    let generation = dungeon.generation + 1;
    events.push(Event::LayoutRegenerated {
        generation,
        rooms: rooms.len(),
        columns: raster.grid.columns(),
        rows: raster.grid.rows(),
        spawn_room: spawn.room,
    });
    info!(
        generation,
        seed,
        rooms = rooms.len(),
        columns = raster.grid.columns(),
        rows = raster.grid.rows(),
        "layout regenerated"
    );

    let layout = Layout {
        settings,
        seed,
        rooms,
        links,
        hallways: raster.hallways,
        open: raster.grid,
        tiles,
        spawn,
    };
    *dungeon = Dungeon {
        layout: Some(layout),
        rng,
        generation,
    };
    out_events.append(&mut events);
    Ok(())
}

/// Reports a shortfall when growth placed fewer branch rooms than requested.
fn growth_truncation(settings: &Settings, generated: u32) -> Option<Event> {
    let requested = settings.room_count();
    if generated >= requested {
        return None;
    }
    warn!(requested, generated, "room growth truncated");
    Some(Event::GrowthTruncated {
        requested,
        generated,
    })
}

/// Populates the current layout through the provided collaborators.
///
/// Population continues the random stream of the last regeneration. Returns
/// `None` when no layout has been generated yet.
pub fn populate<C>(dungeon: &mut Dungeon, callbacks: &mut C) -> Option<PopulationReport>
where
    C: PopulationCallbacks + ?Sized,
{
    let layout = dungeon.layout.as_ref()?;
    let planner = PopulationPlanner::new(&layout.settings);
    Some(planner.populate(
        &layout.rooms,
        layout.spawn.world,
        layout.open.rows(),
        &mut dungeon.rng,
        callbacks,
    ))
}

/// Query functions that provide read-only access to the dungeon state.
pub mod query {
    use super::{Dungeon, Layout};
    use delve_core::{Room, SpawnPoint, TileKindGrid};

    /// Current layout, if one has been generated.
    #[must_use]
    pub fn layout(dungeon: &Dungeon) -> Option<&Layout> {
        dungeon.layout.as_ref()
    }

    /// Rooms of the current layout, empty before the first regeneration.
    #[must_use]
    pub fn rooms(dungeon: &Dungeon) -> &[Room] {
        dungeon
            .layout
            .as_ref()
            .map(Layout::rooms)
            .unwrap_or_default()
    }

    /// Tile grid of the current layout.
    #[must_use]
    pub fn tiles(dungeon: &Dungeon) -> Option<&TileKindGrid> {
        dungeon.layout.as_ref().map(Layout::tiles)
    }

    /// Spawn point of the current layout.
    #[must_use]
    pub fn spawn_point(dungeon: &Dungeon) -> Option<SpawnPoint> {
        dungeon.layout.as_ref().map(Layout::spawn)
    }

    /// Number of layouts published so far.
    #[must_use]
    pub fn generation(dungeon: &Dungeon) -> u64 {
        dungeon.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{RoomSide, TileKind};

    fn settings(room_count: u32) -> Settings {
        Settings::new(3, 7, room_count, 2, 0).expect("valid settings")
    }

    #[test]
    fn new_dungeon_has_no_layout() {
        let dungeon = Dungeon::new();
        assert!(query::layout(&dungeon).is_none());
        assert!(query::rooms(&dungeon).is_empty());
        assert_eq!(query::generation(&dungeon), 0);
    }

    #[test]
    fn regenerate_publishes_layout_and_event() {
        let mut dungeon = Dungeon::new();
        let mut events = Vec::new();
        apply(
            &mut dungeon,
            Command::Regenerate {
                settings: settings(12),
                seed: 7,
            },
            &mut events,
        );

        let layout = query::layout(&dungeon).expect("layout published");
        let Some(Event::LayoutRegenerated {
            generation,
            rooms,
            columns,
            rows,
            spawn_room,
        }) = events.last().cloned()
        else {
            panic!("expected LayoutRegenerated, got {events:?}");
        };
        assert_eq!(generation, 1);
        assert_eq!(rooms, layout.rooms().len());
        assert_eq!(columns, layout.tiles().columns());
        assert_eq!(rows, layout.tiles().rows());
        assert_eq!(spawn_room, layout.spawn().room);
        assert!(!layout.rooms()[spawn_room].should_spawn_enemies());
    }

    #[test]
    fn shortfall_in_growth_is_reported() {
        assert_eq!(
            growth_truncation(&settings(9), 4),
            Some(Event::GrowthTruncated {
                requested: 9,
                generated: 4,
            })
        );
        assert_eq!(growth_truncation(&settings(9), 9), None);
        assert_eq!(growth_truncation(&settings(0), 0), None);
    }

    #[test]
    fn complete_growth_emits_only_the_regeneration_event() {
        let mut dungeon = Dungeon::new();
        let mut events = Vec::new();
        apply(
            &mut dungeon,
            Command::Regenerate {
                settings: settings(15),
                seed: 21,
            },
            &mut events,
        );
        assert_eq!(events.len(), 1, "{events:?}");
        assert!(matches!(events[0], Event::LayoutRegenerated { .. }));
    }

    #[test]
    fn links_form_a_tree_over_the_rooms() {
        let mut dungeon = Dungeon::new();
        let mut events = Vec::new();
        apply(
            &mut dungeon,
            Command::Regenerate {
                settings: settings(16),
                seed: 5,
            },
            &mut events,
        );
        let layout = query::layout(&dungeon).expect("layout published");
        let rooms = layout.rooms();
        let links = layout.links();

        assert_eq!(links.len(), rooms.len() - 1);
        for (offset, link) in links.iter().enumerate() {
            assert_eq!(link.child, offset + 1, "children appear in creation order");
            assert!(link.parent < link.child);
            let (parent, child) = (rooms[link.parent], rooms[link.child]);
            let gap = match link.side {
                RoomSide::Left => parent.left() - child.right(),
                RoomSide::Right => child.left() - parent.right(),
                RoomSide::Top => parent.top() - child.bottom(),
                RoomSide::Bottom => child.top() - parent.bottom(),
            };
            assert_eq!(gap, delve_core::HALLWAY_GAP);
        }
    }

    #[test]
    fn tile_grid_matches_open_grid() {
        let mut dungeon = Dungeon::new();
        let mut events = Vec::new();
        apply(
            &mut dungeon,
            Command::Regenerate {
                settings: settings(20),
                seed: 99,
            },
            &mut events,
        );
        let layout = query::layout(&dungeon).expect("layout published");
        let open = layout.open_grid();
        for row in 0..open.rows() {
            for column in 0..open.columns() {
                let is_floor = layout.tiles().get(column, row) == Some(TileKind::Floor);
                assert_eq!(is_floor, open.is_open(column as i32, row as i32));
            }
        }
    }

    #[test]
    fn rejected_regeneration_keeps_previous_layout() {
        let mut dungeon = Dungeon::new();
        let mut events = Vec::new();
        apply(
            &mut dungeon,
            Command::Regenerate {
                settings: settings(6),
                seed: 1,
            },
            &mut events,
        );
        let before = query::rooms(&dungeon).to_vec();
        events.clear();

        let rejected = try_regenerate(
            &mut dungeon,
            settings(6),
            2,
            |_| Err("missing tile"),
            &mut events,
        );

        assert_eq!(rejected, Err("missing tile"));
        assert!(events.is_empty());
        assert_eq!(query::rooms(&dungeon), before.as_slice());
        assert_eq!(query::generation(&dungeon), 1);
    }

    #[test]
    fn populate_requires_a_layout() {
        struct Silent;
        impl PopulationCallbacks for Silent {
            fn active_enemies(&self) -> u32 {
                0
            }
            fn spawn_weapon_pickup(&mut self, _: glam::Vec2, _: delve_core::WeaponDrop) {}
            fn spawn_lucky_item_pickup(&mut self, _: glam::Vec2, _: delve_core::LuckyItem) {}
            fn spawn_enemy(&mut self, _: delve_core::EnemySpawn) {}
        }

        let mut dungeon = Dungeon::new();
        assert!(populate(&mut dungeon, &mut Silent).is_none());
    }
}
