#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve dungeon generator.
//!
//! This crate defines the value types that flow between the generation
//! systems, the authoritative world and adapters. Adapters submit
//! [`Command`] values, the world rebuilds its layout by running the pure
//! systems in a fixed order and then broadcasts [`Event`] values. Population
//! requests leave the core exclusively through [`PopulationCallbacks`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance in cells between the facing walls of two rooms joined by a hallway.
///
/// The single cell between the walls is the hallway footprint.
pub const HALLWAY_GAP: i32 = 2;

/// Border margin, in cells, that renderers add around the rasterized grid.
pub const OUTER_PADDING: i32 = 4;

/// Side length of one grid cell expressed in world units.
pub const CELL_SIZE: f32 = 0.16;

/// Largest room edge accepted by [`Settings`].
pub const MAX_ROOM_SIZE: u32 = 256;

const DEFAULT_ENEMY_HEALTH: u32 = 10;
const DEFAULT_RARITY_ROLLS: u32 = 1;

/// Commands accepted by the world.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current layout and builds a new one.
    Regenerate {
        /// Validated generation parameters.
        settings: Settings,
        /// Seed of the random stream driving every generation step.
        seed: u64,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a freshly built layout replaced the previous one.
    LayoutRegenerated {
        /// Monotonic counter of published layouts.
        generation: u64,
        /// Number of rooms in the new layout.
        rooms: usize,
        /// Width of the tile grid in cells.
        columns: u32,
        /// Height of the tile grid in cells.
        rows: u32,
        /// Index of the room selected as the player's entry point.
        spawn_room: usize,
    },
    /// Reports that room growth stopped before reaching the requested count.
    GrowthTruncated {
        /// Number of branch rooms requested by the settings.
        requested: u32,
        /// Number of branch rooms that were actually placed.
        generated: u32,
    },
}

/// Side of a room used when attaching a branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomSide {
    /// Toward decreasing columns.
    Left,
    /// Toward increasing columns.
    Right,
    /// Toward decreasing rows.
    Top,
    /// Toward increasing rows.
    Bottom,
}

impl RoomSide {
    /// Every side in declaration order.
    pub const ALL: [RoomSide; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Returns the side facing the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Axis-aligned rectangular room expressed in grid cells.
///
/// Rooms are plain values; "mutating" a stored room means writing a modified
/// copy back to its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    spawn_enemies: bool,
}

impl Room {
    /// Creates a room anchored at its top-left cell that allows enemies.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            spawn_enemies: true,
        }
    }

    /// Column of the top-left cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the top-left cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width of the room in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the room in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Leftmost column occupied by the room.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Topmost row occupied by the room.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Rightmost column occupied by the room (inclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    /// Bottom row occupied by the room (inclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }

    /// Cell at the room's midpoint, rounded toward the top-left.
    #[must_use]
    pub const fn middle(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Reports whether enemies may be placed inside the room.
    #[must_use]
    pub const fn should_spawn_enemies(&self) -> bool {
        self.spawn_enemies
    }

    /// Returns a copy of the room that no longer accepts enemies.
    #[must_use]
    pub const fn without_enemies(self) -> Self {
        Self {
            spawn_enemies: false,
            ..self
        }
    }

    /// Returns a copy of the room shifted by the provided offsets.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Reports whether the cell lies inside the room.
    #[must_use]
    pub const fn contains(&self, column: i32, row: i32) -> bool {
        column >= self.left()
            && column <= self.right()
            && row >= self.top()
            && row <= self.bottom()
    }

    /// Reports whether this room, grown by one cell on every side, overlaps
    /// `other` on both axes.
    ///
    /// Rooms separated by at least one empty cell on some axis do not
    /// intersect.
    #[must_use]
    pub const fn intersects_padded(&self, other: &Room) -> bool {
        self.left() - 1 <= other.right()
            && other.left() <= self.right() + 1
            && self.top() - 1 <= other.bottom()
            && other.top() <= self.bottom() + 1
    }
}

/// Axis-aligned bounding box of a room set. Maximum edges are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Bounds {
    /// Computes the box enclosing every room, or `None` for an empty slice.
    #[must_use]
    pub fn enclosing(rooms: &[Room]) -> Option<Self> {
        let first = rooms.first()?;
        let seed = Self {
            min_x: first.left(),
            min_y: first.top(),
            max_x: first.right() + 1,
            max_y: first.bottom() + 1,
        };
        Some(rooms.iter().skip(1).fold(seed, |bounds, room| Self {
            min_x: bounds.min_x.min(room.left()),
            min_y: bounds.min_y.min(room.top()),
            max_x: bounds.max_x.max(room.right() + 1),
            max_y: bounds.max_y.max(room.bottom() + 1),
        }))
    }

    /// Smallest column covered by the box.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Smallest row covered by the box.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Column just past the right edge of the box.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Row just past the bottom edge of the box.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Width of the box in cells.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.max_x.abs_diff(self.min_x)
    }

    /// Height of the box in cells.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.max_y.abs_diff(self.min_y)
    }

    /// Geometric centre of the box in grid space.
    #[must_use]
    pub fn centroid(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) as f32 / 2.0,
            (self.min_y + self.max_y) as f32 / 2.0,
        )
    }
}

/// Opaque theme identifiers passed through to external collaborators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemeTags {
    /// Identifier of the visual tileset theme.
    #[serde(default)]
    pub visual: String,
    /// Identifier of the enemy sprite sheet.
    #[serde(default)]
    pub enemy: String,
}

/// Reasons a [`Settings`] value may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Room sizes must be strictly positive.
    #[error("room sizes must be positive")]
    ZeroRoomSize,
    /// The minimum room size exceeds the maximum.
    #[error("room_min_size {min} exceeds room_max_size {max}")]
    InvertedRoomSizes {
        /// Requested minimum room size.
        min: u32,
        /// Requested maximum room size.
        max: u32,
    },
    /// The maximum room size exceeds [`MAX_ROOM_SIZE`].
    #[error("room_max_size {max} exceeds the supported limit of {limit}")]
    RoomTooLarge {
        /// Requested maximum room size.
        max: u32,
        /// Largest supported room size.
        limit: u32,
    },
    /// Hallways must be at least one cell wide.
    #[error("hall_width must be at least 1")]
    ZeroHallWidth,
    /// Hallways cannot be wider than the narrowest room.
    #[error("hall_width {hall_width} exceeds room_min_size {room_min_size}")]
    HallTooWide {
        /// Requested hallway width.
        hall_width: u32,
        /// Requested minimum room size.
        room_min_size: u32,
    },
}

/// Validated dungeon generation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SettingsFile")]
pub struct Settings {
    room_min_size: u32,
    room_max_size: u32,
    room_count: u32,
    hall_width: u32,
    avg_enemies: u32,
    enemy_health: u32,
    rarity_rolls: u32,
    theme: ThemeTags,
}

impl Settings {
    /// Creates validated settings with default health, rarity and theme.
    pub fn new(
        room_min_size: u32,
        room_max_size: u32,
        room_count: u32,
        hall_width: u32,
        avg_enemies: u32,
    ) -> Result<Self, SettingsError> {
        validate(room_min_size, room_max_size, hall_width)?;
        Ok(Self {
            room_min_size,
            room_max_size,
            room_count,
            hall_width,
            avg_enemies,
            enemy_health: DEFAULT_ENEMY_HEALTH,
            rarity_rolls: DEFAULT_RARITY_ROLLS,
            theme: ThemeTags::default(),
        })
    }

    /// Replaces the theme tags.
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeTags) -> Self {
        self.theme = theme;
        self
    }

    /// Replaces the health assigned to spawned enemies.
    #[must_use]
    pub fn with_enemy_health(mut self, enemy_health: u32) -> Self {
        self.enemy_health = enemy_health;
        self
    }

    /// Replaces the number of rarity rolls taken per weapon drop.
    #[must_use]
    pub fn with_rarity_rolls(mut self, rarity_rolls: u32) -> Self {
        self.rarity_rolls = rarity_rolls;
        self
    }

    /// Smallest room edge in cells.
    #[must_use]
    pub const fn room_min_size(&self) -> u32 {
        self.room_min_size
    }

    /// Largest room edge in cells.
    #[must_use]
    pub const fn room_max_size(&self) -> u32 {
        self.room_max_size
    }

    /// Number of branch rooms to grow from the root.
    #[must_use]
    pub const fn room_count(&self) -> u32 {
        self.room_count
    }

    /// Width of every hallway in cells.
    #[must_use]
    pub const fn hall_width(&self) -> u32 {
        self.hall_width
    }

    /// Enemy population the planner keeps topping up to.
    #[must_use]
    pub const fn avg_enemies(&self) -> u32 {
        self.avg_enemies
    }

    /// Health assigned to each spawned enemy.
    #[must_use]
    pub const fn enemy_health(&self) -> u32 {
        self.enemy_health
    }

    /// Number of rarity rolls taken per weapon drop; the best roll wins.
    #[must_use]
    pub const fn rarity_rolls(&self) -> u32 {
        self.rarity_rolls
    }

    /// Theme tags forwarded to collaborators.
    #[must_use]
    pub const fn theme(&self) -> &ThemeTags {
        &self.theme
    }
}

fn validate(room_min_size: u32, room_max_size: u32, hall_width: u32) -> Result<(), SettingsError> {
    if room_min_size == 0 || room_max_size == 0 {
        return Err(SettingsError::ZeroRoomSize);
    }
    if room_min_size > room_max_size {
        return Err(SettingsError::InvertedRoomSizes {
            min: room_min_size,
            max: room_max_size,
        });
    }
    if room_max_size > MAX_ROOM_SIZE {
        return Err(SettingsError::RoomTooLarge {
            max: room_max_size,
            limit: MAX_ROOM_SIZE,
        });
    }
    if hall_width == 0 {
        return Err(SettingsError::ZeroHallWidth);
    }
    if hall_width > room_min_size {
        return Err(SettingsError::HallTooWide {
            hall_width,
            room_min_size,
        });
    }
    Ok(())
}

#[derive(Deserialize)]
struct SettingsFile {
    room_min_size: u32,
    room_max_size: u32,
    room_count: u32,
    hall_width: u32,
    #[serde(default)]
    avg_enemies: u32,
    #[serde(default = "default_enemy_health")]
    enemy_health: u32,
    #[serde(default = "default_rarity_rolls")]
    rarity_rolls: u32,
    #[serde(default)]
    theme: ThemeTags,
}

fn default_enemy_health() -> u32 {
    DEFAULT_ENEMY_HEALTH
}

fn default_rarity_rolls() -> u32 {
    DEFAULT_RARITY_ROLLS
}

impl TryFrom<SettingsFile> for Settings {
    type Error = SettingsError;

    fn try_from(file: SettingsFile) -> Result<Self, Self::Error> {
        Ok(Settings::new(
            file.room_min_size,
            file.room_max_size,
            file.room_count,
            file.hall_width,
            file.avg_enemies,
        )?
        .with_enemy_health(file.enemy_health)
        .with_rarity_rolls(file.rarity_rolls)
        .with_theme(file.theme))
    }
}

/// Visual classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Walkable open cell.
    Floor,
    /// Solid wall with no visible edge.
    Ceiling,
    /// Wall whose open side faces right.
    EdgeLeft,
    /// Wall whose open side faces left.
    EdgeRight,
    /// Wall whose open side faces down.
    EdgeTop,
    /// Wall whose open side faces up.
    EdgeBottom,
    /// Outer corner with floor diagonally below-right.
    CornerTopLeft,
    /// Outer corner with floor diagonally below-left.
    CornerTopRight,
    /// Outer corner with floor diagonally above-right.
    CornerBottomLeft,
    /// Outer corner with floor diagonally above-left.
    CornerBottomRight,
    /// Inner corner whose only wall diagonal is the top-left.
    StubTopLeft,
    /// Inner corner whose only wall diagonal is the top-right.
    StubTopRight,
    /// Inner corner whose only wall diagonal is the bottom-left.
    StubBottomLeft,
    /// Inner corner whose only wall diagonal is the bottom-right.
    StubBottomRight,
}

impl TileKind {
    /// Every tile kind in declaration order.
    pub const ALL: [TileKind; 14] = [
        Self::Floor,
        Self::Ceiling,
        Self::EdgeLeft,
        Self::EdgeRight,
        Self::EdgeTop,
        Self::EdgeBottom,
        Self::CornerTopLeft,
        Self::CornerTopRight,
        Self::CornerBottomLeft,
        Self::CornerBottomRight,
        Self::StubTopLeft,
        Self::StubTopRight,
        Self::StubBottomLeft,
        Self::StubBottomRight,
    ];

    /// Snake-case identifier used by manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::EdgeLeft => "edge_left",
            Self::EdgeRight => "edge_right",
            Self::EdgeTop => "edge_top",
            Self::EdgeBottom => "edge_bottom",
            Self::CornerTopLeft => "corner_top_left",
            Self::CornerTopRight => "corner_top_right",
            Self::CornerBottomLeft => "corner_bottom_left",
            Self::CornerBottomRight => "corner_bottom_right",
            Self::StubTopLeft => "stub_top_left",
            Self::StubTopRight => "stub_top_right",
            Self::StubBottomLeft => "stub_bottom_left",
            Self::StubBottomRight => "stub_bottom_right",
        }
    }

    /// Parses a snake-case identifier produced by [`TileKind::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Dense boolean grid where `true` marks an open floor cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpenGrid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl OpenGrid {
    /// Creates a grid in which every cell is a wall.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cells: vec![false; columns as usize * rows as usize],
        }
    }

    /// Width of the grid in cells.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the grid in cells.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell is open. Cells outside the grid are walls.
    #[must_use]
    pub fn is_open(&self, column: i32, row: i32) -> bool {
        self.index(column, row)
            .map_or(false, |index| self.cells[index])
    }

    /// Marks the cell as open. Cells outside the grid are ignored.
    pub fn open(&mut self, column: i32, row: i32) {
        if let Some(index) = self.index(column, row) {
            self.cells[index] = true;
        }
    }

    /// Opens every cell of the rectangle, clipping to the grid.
    pub fn open_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        for row in y..y + height as i32 {
            for column in x..x + width as i32 {
                self.open(column, row);
            }
        }
    }

    /// Counts the open cells.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|open| **open).count()
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            Some(row as usize * self.columns as usize + column as usize)
        } else {
            None
        }
    }
}

/// Dense grid of classified tiles with the dimensions of its [`OpenGrid`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileKindGrid {
    columns: u32,
    rows: u32,
    cells: Vec<TileKind>,
}

impl TileKindGrid {
    /// Builds a grid by evaluating `kind_at` for every cell in row-major order.
    #[must_use]
    pub fn from_fn(columns: u32, rows: u32, mut kind_at: impl FnMut(i32, i32) -> TileKind) -> Self {
        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows as i32 {
            for column in 0..columns as i32 {
                cells.push(kind_at(column, row));
            }
        }
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Width of the grid in cells.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the grid in cells.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the tile kind at the cell, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, column: u32, row: u32) -> Option<TileKind> {
        if column < self.columns && row < self.rows {
            self.cells
                .get(row as usize * self.columns as usize + column as usize)
                .copied()
        } else {
            None
        }
    }

    /// Iterates the rows of the grid from top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[TileKind]> {
        self.cells.chunks(self.columns.max(1) as usize)
    }

    /// Iterates every tile kind in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.cells.iter().copied()
    }
}

/// Maps a grid-space position to world space.
///
/// The Y axis is inverted relative to grid rows; `grid_rows` is the height of
/// the rasterized grid before the renderer adds [`OUTER_PADDING`].
#[must_use]
pub fn grid_to_world(tile: Vec2, grid_rows: u32) -> Vec2 {
    let padding = OUTER_PADDING as f32;
    Vec2::new(
        (padding + tile.x) * CELL_SIZE,
        (grid_rows as f32 - (tile.y - padding)) * CELL_SIZE,
    )
}

/// Player entry point chosen for a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    /// Index of the spawn room in the room sequence.
    pub room: usize,
    /// Midpoint cell of the spawn room.
    pub cell: (i32, i32),
    /// Midpoint of the spawn room in world space.
    pub world: Vec2,
}

/// Weapons that can be dropped or carried by enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Reliable starter pistol.
    BasicPistol,
    /// Fast, inaccurate foam blaster.
    NerfBlaster,
    /// Slow, hard-hitting pistol.
    InjectorPistol,
    /// Heavy, wild revolver.
    BigHunka,
    /// Precise sniper rifle.
    Scopey,
    /// Quick sniper firing nails.
    NailSniper,
    /// Four-pellet shotgun.
    SuperShotgun,
    /// Six-pellet shotgun.
    SawedOff,
    /// Automatic rifle.
    AssaultRifle,
    /// Rapid automatic pistol.
    Uzi,
    /// Heavy automatic rifle.
    TommyGun,
}

/// Combat statistics of a [`Weapon`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponStats {
    /// Damage dealt per projectile.
    pub damage: u32,
    /// Seconds between shots.
    pub cooldown_secs: f32,
    /// Projectiles fired per shot.
    pub projectile_count: u32,
    /// Whether the weapon keeps firing while the trigger is held.
    pub automatic: bool,
}

impl Weapon {
    /// Every weapon in catalog order.
    pub const ALL: [Weapon; 11] = [
        Self::BasicPistol,
        Self::NerfBlaster,
        Self::InjectorPistol,
        Self::BigHunka,
        Self::Scopey,
        Self::NailSniper,
        Self::SuperShotgun,
        Self::SawedOff,
        Self::AssaultRifle,
        Self::Uzi,
        Self::TommyGun,
    ];

    /// Display name of the weapon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BasicPistol => "Basic Pistol",
            Self::NerfBlaster => "Nerf Blaster",
            Self::InjectorPistol => "Injector Pistol",
            Self::BigHunka => "Big Hunka",
            Self::Scopey => "Scopey",
            Self::NailSniper => "Nail Sniper",
            Self::SuperShotgun => "Super Shotgun",
            Self::SawedOff => "Sawed Off",
            Self::AssaultRifle => "Assault Rifle",
            Self::Uzi => "Uzi",
            Self::TommyGun => "Tommy Gun",
        }
    }

    /// Combat statistics of the weapon.
    #[must_use]
    pub const fn stats(self) -> WeaponStats {
        let (damage, cooldown_secs, projectile_count, automatic) = match self {
            Self::BasicPistol => (3, 0.25, 1, false),
            Self::NerfBlaster => (2, 0.1, 1, false),
            Self::InjectorPistol => (5, 0.6, 1, false),
            Self::BigHunka => (8, 0.8, 1, false),
            Self::Scopey => (12, 1.5, 1, false),
            Self::NailSniper => (7, 0.65, 1, false),
            Self::SuperShotgun => (2, 0.5, 4, false),
            Self::SawedOff => (2, 0.75, 6, false),
            Self::AssaultRifle => (2, 0.235, 1, true),
            Self::Uzi => (1, 0.1, 1, true),
            Self::TommyGun => (3, 0.2, 1, true),
        };
        WeaponStats {
            damage,
            cooldown_secs,
            projectile_count,
            automatic,
        }
    }
}

/// Quality tier rolled for weapon drops. Later variants are rarer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Baseline tier.
    Unremarkable,
    /// Slightly improved tier.
    Cool,
    /// Uncommon tier.
    DoubleTake,
    /// Rare tier.
    TripleTake,
    /// Rarest tier.
    Unbelievable,
}

impl Rarity {
    /// Maps a percent roll in `0..100` to a tier.
    #[must_use]
    pub const fn from_percent(percent: u32) -> Self {
        match percent {
            0..=79 => Self::Unremarkable,
            80..=91 => Self::Cool,
            92..=96 => Self::DoubleTake,
            97..=98 => Self::TripleTake,
            _ => Self::Unbelievable,
        }
    }

    /// Multiplier applied to weapon damage.
    #[must_use]
    pub const fn damage_multiplier(self) -> f32 {
        match self {
            Self::Unremarkable => 1.0,
            Self::Cool => 1.1,
            Self::DoubleTake => 1.25,
            Self::TripleTake => 1.5,
            Self::Unbelievable => 2.0,
        }
    }
}

/// Weapon pickup request payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WeaponDrop {
    /// Weapon to place.
    pub weapon: Weapon,
    /// Rarity rolled for the weapon.
    pub rarity: Rarity,
}

/// Passive items that improve the player when collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LuckyItem {
    /// Extra rarity roll per clover.
    Clover,
    /// Thrown weapons hit harder.
    Rock,
    /// Larger pickup range.
    Spring,
    /// Bullet time on kill.
    Sandbag,
    /// Faster shooting.
    Ring,
}

impl LuckyItem {
    /// Every lucky item in catalog order.
    pub const ALL: [LuckyItem; 5] = [
        Self::Clover,
        Self::Rock,
        Self::Spring,
        Self::Sandbag,
        Self::Ring,
    ];

    /// Display name of the item.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clover => "Lucky Clover",
            Self::Rock => "Lucky Rock",
            Self::Spring => "Lucky Spring",
            Self::Sandbag => "Lucky Sandbag",
            Self::Ring => "Lucky Ring",
        }
    }
}

/// Sprite variant selected for a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteVariant {
    /// First variant of the theme's sprite sheet.
    First,
    /// Second variant of the theme's sprite sheet.
    Second,
    /// Third variant of the theme's sprite sheet.
    Third,
}

impl SpriteVariant {
    /// Every variant in sheet order.
    pub const ALL: [SpriteVariant; 3] = [Self::First, Self::Second, Self::Third];
}

/// Enemy spawn request payload.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    /// World-space position of the enemy.
    pub position: Vec2,
    /// Starting health.
    pub health: u32,
    /// Initial aim direction in degrees, counter-clockwise from +X.
    pub facing_degrees: f32,
    /// Enemy theme tag copied from the settings.
    pub theme: String,
    /// Weapon carried by the enemy.
    pub weapon: WeaponDrop,
    /// Sprite variant within the theme's sheet.
    pub variant: SpriteVariant,
}

/// External collaborators that realise population requests.
pub trait PopulationCallbacks {
    /// Number of enemies currently alive in the level.
    fn active_enemies(&self) -> u32;

    /// Places a weapon pickup at the world-space position.
    fn spawn_weapon_pickup(&mut self, position: Vec2, drop: WeaponDrop);

    /// Places a lucky item pickup at the world-space position.
    fn spawn_lucky_item_pickup(&mut self, position: Vec2, item: LuckyItem);

    /// Spawns an enemy.
    fn spawn_enemy(&mut self, spawn: EnemySpawn);
}
