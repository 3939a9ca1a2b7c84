use std::fmt;

use delve_core::{EnemySpawn, LuckyItem, PopulationCallbacks, WeaponDrop};
use delve_system_loot::effective_damage;
use glam::Vec2;

/// Population collaborator that records requests for printing.
///
/// Every requested enemy counts as alive, so planning stops as soon as the
/// configured average has been requested.
#[derive(Debug, Default)]
pub(crate) struct PopulationLog {
    entries: Vec<PlanEntry>,
    enemies: u32,
}

impl PopulationLog {
    /// Recorded requests in issue order.
    pub(crate) fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }
}

/// One recorded population request.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PlanEntry {
    Weapon { position: Vec2, drop: WeaponDrop },
    Lucky { position: Vec2, item: LuckyItem },
    Enemy(EnemySpawn),
}

impl PopulationCallbacks for PopulationLog {
    fn active_enemies(&self) -> u32 {
        self.enemies
    }

    fn spawn_weapon_pickup(&mut self, position: Vec2, drop: WeaponDrop) {
        self.entries.push(PlanEntry::Weapon { position, drop });
    }

    fn spawn_lucky_item_pickup(&mut self, position: Vec2, item: LuckyItem) {
        self.entries.push(PlanEntry::Lucky { position, item });
    }

    fn spawn_enemy(&mut self, spawn: EnemySpawn) {
        self.enemies += 1;
        self.entries.push(PlanEntry::Enemy(spawn));
    }
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon { position, drop } => write!(
                f,
                "weapon  ({:>7.2}, {:>7.2}) {} [{:?}, {:.1} dmg]",
                position.x,
                position.y,
                drop.weapon.name(),
                drop.rarity,
                effective_damage(*drop)
            ),
            Self::Lucky { position, item } => write!(
                f,
                "lucky   ({:>7.2}, {:>7.2}) {}",
                position.x,
                position.y,
                item.name()
            ),
            Self::Enemy(spawn) => write!(
                f,
                "enemy   ({:>7.2}, {:>7.2}) {} hp {} facing {:.0}deg with {} [{:?}] variant {:?}",
                spawn.position.x,
                spawn.position.y,
                if spawn.theme.is_empty() {
                    "enemy"
                } else {
                    spawn.theme.as_str()
                },
                spawn.health,
                spawn.facing_degrees,
                spawn.weapon.weapon.name(),
                spawn.weapon.rarity,
                spawn.variant
            ),
        }
    }
}
