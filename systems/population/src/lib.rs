#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population planner that scatters pickups and enemies across a layout.
//!
//! The planner never owns entities. It issues requests through
//! [`PopulationCallbacks`] and relies on the collaborator to report how many
//! enemies are alive, repeating passes over every room until that count
//! reaches the configured average.

use delve_core::{
    grid_to_world, EnemySpawn, PopulationCallbacks, Room, Settings, SpriteVariant,
};
use delve_system_loot::{Loot, LootTable};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

/// Odds, as numerator and denominator, that another pickup is placed in a room.
pub const PICKUP_ODDS: (u32, u32) = (1, 6);

/// Odds, as numerator and denominator, that another enemy is placed in a room.
pub const ENEMY_ODDS: (u32, u32) = (1, 8);

/// Enemies placed per room in a single pass at most.
pub const MAX_ENEMIES_PER_ROOM: u32 = 3;

/// Passes after which the planner gives up on reaching the enemy average.
pub const MAX_POPULATION_PASSES: u32 = 256;

/// Enemies spawned within this world-space distance of the spawn point aim at it.
pub const SPAWN_AIM_DISTANCE: f32 = 1.0;

/// Summary of the requests issued by one planning run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulationReport {
    /// Number of passes over the room sequence.
    pub passes: u32,
    /// Weapon pickups requested.
    pub weapon_pickups: u32,
    /// Lucky item pickups requested.
    pub lucky_pickups: u32,
    /// Enemies requested.
    pub enemies: u32,
}

/// Pure system that turns a finished layout into spawn requests.
#[derive(Clone, Debug)]
pub struct PopulationPlanner {
    avg_enemies: u32,
    enemy_health: u32,
    enemy_theme: String,
    loot: LootTable,
}

impl PopulationPlanner {
    /// Creates a planner configured from the generation settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            avg_enemies: settings.avg_enemies(),
            enemy_health: settings.enemy_health(),
            enemy_theme: settings.theme().enemy.clone(),
            loot: LootTable::new(settings.rarity_rolls()),
        }
    }

    /// Runs population passes until the collaborator reports at least the
    /// configured average of active enemies.
    ///
    /// When no room accepts enemies a single pass places the per-room pickups
    /// and planning stops.
    ///
    /// `spawn` is the world-space spawn point and `grid_rows` the height of
    /// the rasterized grid used to map room cells to world space.
    pub fn populate<R, C>(
        &self,
        rooms: &[Room],
        spawn: Vec2,
        grid_rows: u32,
        rng: &mut R,
        callbacks: &mut C,
    ) -> PopulationReport
    where
        R: Rng + ?Sized,
        C: PopulationCallbacks + ?Sized,
    {
        let mut report = PopulationReport::default();
        if self.avg_enemies == 0 {
            return report;
        }
        let eligible = rooms.iter().any(Room::should_spawn_enemies);

        while callbacks.active_enemies() < self.avg_enemies {
            if report.passes == MAX_POPULATION_PASSES {
                warn!(
                    passes = report.passes,
                    target = self.avg_enemies,
                    active = callbacks.active_enemies(),
                    "population stopped before reaching the enemy average"
                );
                break;
            }
            report.passes += 1;

            for room in rooms {
                if !room.should_spawn_enemies() {
                    self.place_pickup(room, grid_rows, rng, callbacks, &mut report);
                    continue;
                }

                while rng.gen_ratio(PICKUP_ODDS.0, PICKUP_ODDS.1) {
                    self.place_pickup(room, grid_rows, rng, callbacks, &mut report);
                }

                let mut placed = 0;
                while placed < MAX_ENEMIES_PER_ROOM && rng.gen_ratio(ENEMY_ODDS.0, ENEMY_ODDS.1) {
                    let spawn_request = self.roll_enemy(room, spawn, grid_rows, rng);
                    callbacks.spawn_enemy(spawn_request);
                    report.enemies += 1;
                    placed += 1;
                }
            }

            if !eligible {
                warn!(
                    rooms = rooms.len(),
                    "no room accepts enemies; stopping after one pass"
                );
                break;
            }
        }

        debug!(?report, "population finished");
        report
    }

    fn place_pickup<R, C>(
        &self,
        room: &Room,
        grid_rows: u32,
        rng: &mut R,
        callbacks: &mut C,
        report: &mut PopulationReport,
    ) where
        R: Rng + ?Sized,
        C: PopulationCallbacks + ?Sized,
    {
        let position = random_point(room, grid_rows, rng);
        match self.loot.roll_drop(rng) {
            Loot::Weapon(drop) => {
                callbacks.spawn_weapon_pickup(position, drop);
                report.weapon_pickups += 1;
            }
            Loot::LuckyItem(item) => {
                callbacks.spawn_lucky_item_pickup(position, item);
                report.lucky_pickups += 1;
            }
        }
    }

    fn roll_enemy<R: Rng + ?Sized>(
        &self,
        room: &Room,
        spawn: Vec2,
        grid_rows: u32,
        rng: &mut R,
    ) -> EnemySpawn {
        let position = random_point(room, grid_rows, rng);
        let facing_degrees = if position.distance(spawn) <= SPAWN_AIM_DISTANCE {
            let toward = spawn - position;
            toward.y.atan2(toward.x).to_degrees()
        } else {
            rng.gen_range(0.0..360.0)
        };
        let weapon = self.loot.roll_weapon(rng);
        let variant = SpriteVariant::ALL[rng.gen_range(0..SpriteVariant::ALL.len())];

        EnemySpawn {
            position,
            health: self.enemy_health,
            facing_degrees,
            theme: self.enemy_theme.clone(),
            weapon,
            variant,
        }
    }
}

/// Uniform point inside the room's cells, mapped to world space.
fn random_point<R: Rng + ?Sized>(room: &Room, grid_rows: u32, rng: &mut R) -> Vec2 {
    let column = rng.gen_range(room.left() as f32..(room.right() + 1) as f32);
    let row = rng.gen_range(room.top() as f32..(room.bottom() + 1) as f32);
    grid_to_world(Vec2::new(column, row), grid_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::CELL_SIZE;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn random_points_stay_inside_the_room() {
        let room = Room::new(3, 2, 4, 2);
        let rows = 10;
        let top_left = grid_to_world(Vec2::new(3.0, 2.0), rows);
        let bottom_right = grid_to_world(Vec2::new(7.0, 4.0), rows);
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        for _ in 0..500 {
            let point = random_point(&room, rows, &mut rng);
            assert!(point.x >= top_left.x && point.x < bottom_right.x + f32::EPSILON);
            assert!(point.y <= top_left.y && point.y > bottom_right.y - f32::EPSILON);
        }
        assert!(((bottom_right.x - top_left.x) - 4.0 * CELL_SIZE).abs() < 1e-5);
    }
}
