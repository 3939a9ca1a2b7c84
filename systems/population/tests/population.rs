use std::cell::Cell;

use delve_core::{
    grid_to_world, EnemySpawn, LuckyItem, PopulationCallbacks, Room, Settings, ThemeTags,
    WeaponDrop,
};
use delve_system_population::{PopulationPlanner, MAX_ENEMIES_PER_ROOM, MAX_POPULATION_PASSES};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GRID_ROWS: u32 = 12;

/// Records every request and reports spawned enemies as alive unless muted.
#[derive(Debug, Default, PartialEq)]
struct Recorder {
    weapons: Vec<(Vec2, WeaponDrop)>,
    items: Vec<(Vec2, LuckyItem)>,
    enemies: Vec<EnemySpawn>,
    mute_enemies: bool,
    queries: Cell<u32>,
}

impl PopulationCallbacks for Recorder {
    fn active_enemies(&self) -> u32 {
        self.queries.set(self.queries.get() + 1);
        if self.mute_enemies {
            0
        } else {
            self.enemies.len() as u32
        }
    }

    fn spawn_weapon_pickup(&mut self, position: Vec2, drop: WeaponDrop) {
        self.weapons.push((position, drop));
    }

    fn spawn_lucky_item_pickup(&mut self, position: Vec2, item: LuckyItem) {
        self.items.push((position, item));
    }

    fn spawn_enemy(&mut self, spawn: EnemySpawn) {
        self.enemies.push(spawn);
    }
}

fn settings(avg_enemies: u32) -> Settings {
    Settings::new(3, 6, 4, 1, avg_enemies)
        .expect("valid settings")
        .with_enemy_health(17)
        .with_theme(ThemeTags {
            visual: "sewer".to_owned(),
            enemy: "rat".to_owned(),
        })
}

fn layout() -> (Vec<Room>, Vec2) {
    let rooms = vec![
        Room::new(0, 0, 4, 4).without_enemies(),
        Room::new(6, 0, 5, 4),
        Room::new(6, 6, 5, 5),
    ];
    let spawn = grid_to_world(Vec2::new(2.0, 2.0), GRID_ROWS);
    (rooms, spawn)
}

fn run(avg_enemies: u32, seed: u64, recorder: &mut Recorder) -> u32 {
    let (rooms, spawn) = layout();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    PopulationPlanner::new(&settings(avg_enemies))
        .populate(&rooms, spawn, GRID_ROWS, &mut rng, recorder)
        .passes
}

#[test]
fn zero_average_issues_no_callbacks() {
    let mut recorder = Recorder::default();
    let passes = run(0, 1, &mut recorder);
    assert_eq!(passes, 0);
    assert_eq!(recorder, Recorder::default());
}

#[test]
fn population_reaches_the_enemy_average() {
    let mut recorder = Recorder::default();
    let passes = run(6, 3, &mut recorder);
    assert!(passes >= 1);
    assert!(recorder.enemies.len() >= 6);
    for enemy in &recorder.enemies {
        assert_eq!(enemy.health, 17);
        assert_eq!(enemy.theme, "rat");
        assert!(
            (-180.0..360.0).contains(&enemy.facing_degrees),
            "facing {} out of range",
            enemy.facing_degrees
        );
    }
}

#[test]
fn spawn_room_gets_one_pickup_per_pass_and_no_enemies() {
    let mut recorder = Recorder::default();
    let passes = run(4, 8, &mut recorder);
    let (rooms, _) = layout();
    let spawn_room = rooms[0];
    let low = grid_to_world(Vec2::new(0.0, 4.0), GRID_ROWS);
    let high = grid_to_world(Vec2::new(4.0, 0.0), GRID_ROWS);
    let inside = |p: Vec2| p.x >= low.x && p.x <= high.x && p.y >= low.y && p.y <= high.y;

    let pickups_in_spawn = recorder
        .weapons
        .iter()
        .map(|(p, _)| *p)
        .chain(recorder.items.iter().map(|(p, _)| *p))
        .filter(|p| inside(*p))
        .count();
    assert!(pickups_in_spawn >= passes as usize, "{spawn_room:?} missed a pickup");
    assert!(recorder.enemies.iter().all(|enemy| !inside(enemy.position)));
}

#[test]
fn muted_collaborator_stops_at_the_pass_cap() {
    let mut recorder = Recorder {
        mute_enemies: true,
        ..Recorder::default()
    };
    let passes = run(5, 11, &mut recorder);
    assert_eq!(passes, MAX_POPULATION_PASSES);
    assert!(recorder.weapons.len() + recorder.items.len() >= MAX_POPULATION_PASSES as usize);
    assert!(recorder.enemies.len() <= (MAX_POPULATION_PASSES * 2 * MAX_ENEMIES_PER_ROOM) as usize);
}

#[test]
fn layouts_without_eligible_rooms_get_one_pass_of_pickups() {
    let rooms = vec![
        Room::new(0, 0, 3, 3).without_enemies(),
        Room::new(5, 0, 3, 3).without_enemies(),
    ];
    let mut recorder = Recorder::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let report = PopulationPlanner::new(&settings(3)).populate(
        &rooms,
        Vec2::ZERO,
        3,
        &mut rng,
        &mut recorder,
    );
    assert_eq!(report.passes, 1);
    assert_eq!(report.enemies, 0);
    assert!(recorder.enemies.is_empty());
    assert_eq!(recorder.weapons.len() + recorder.items.len(), rooms.len());
    assert_eq!(
        (report.weapon_pickups + report.lucky_pickups) as usize,
        rooms.len()
    );
}

#[test]
fn enemies_near_the_spawn_aim_at_it() {
    let rooms = vec![Room::new(0, 0, 2, 2)];
    let spawn = grid_to_world(Vec2::new(1.0, 1.0), 2);
    let mut recorder = Recorder::default();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let _ = PopulationPlanner::new(&settings(5)).populate(&rooms, spawn, 2, &mut rng, &mut recorder);

    assert!(!recorder.enemies.is_empty());
    for enemy in &recorder.enemies {
        let toward = spawn - enemy.position;
        let expected = toward.y.atan2(toward.x).to_degrees();
        assert!((enemy.facing_degrees - expected).abs() < 1e-4);
    }
}

#[test]
fn population_is_deterministic_per_seed() {
    let mut first = Recorder::default();
    let mut second = Recorder::default();
    let _ = run(8, 77, &mut first);
    let _ = run(8, 77, &mut second);
    assert_eq!(first, second);
}
