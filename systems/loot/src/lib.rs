#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loot rolls shared by level population and runtime drops.

use delve_core::{LuckyItem, Rarity, Weapon, WeaponDrop};
use rand::Rng;

/// Probability that a rolled drop is a weapon rather than a lucky item.
pub const WEAPON_DROP_CHANCE: f64 = 0.95;

/// Outcome of a drop-type roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Loot {
    /// A weapon pickup.
    Weapon(WeaponDrop),
    /// A lucky item pickup.
    LuckyItem(LuckyItem),
}

/// Roll policy for drops, parameterised by the number of rarity rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LootTable {
    rarity_rolls: u32,
}

impl LootTable {
    /// Creates a table that keeps the best of `rarity_rolls` rarity rolls.
    /// Zero is treated as a single roll.
    #[must_use]
    pub const fn new(rarity_rolls: u32) -> Self {
        Self { rarity_rolls }
    }

    /// Rolls the drop type and then its contents.
    pub fn roll_drop<R: Rng + ?Sized>(&self, rng: &mut R) -> Loot {
        if rng.gen_bool(WEAPON_DROP_CHANCE) {
            Loot::Weapon(self.roll_weapon(rng))
        } else {
            Loot::LuckyItem(self.roll_lucky_item(rng))
        }
    }

    /// Rolls a uniformly chosen weapon and its rarity.
    pub fn roll_weapon<R: Rng + ?Sized>(&self, rng: &mut R) -> WeaponDrop {
        let weapon = Weapon::ALL[rng.gen_range(0..Weapon::ALL.len())];
        WeaponDrop {
            weapon,
            rarity: self.roll_rarity(rng),
        }
    }

    /// Rolls percent values and keeps the rarest resulting tier.
    pub fn roll_rarity<R: Rng + ?Sized>(&self, rng: &mut R) -> Rarity {
        (0..self.rarity_rolls.max(1))
            .map(|_| Rarity::from_percent(rng.gen_range(0..100)))
            .max()
            .unwrap_or(Rarity::Unremarkable)
    }

    /// Rolls a uniformly chosen lucky item.
    pub fn roll_lucky_item<R: Rng + ?Sized>(&self, rng: &mut R) -> LuckyItem {
        LuckyItem::ALL[rng.gen_range(0..LuckyItem::ALL.len())]
    }
}

/// Damage per projectile after applying the rarity multiplier.
#[must_use]
pub fn effective_damage(drop: WeaponDrop) -> f32 {
    drop.weapon.stats().damage as f32 * drop.rarity.damage_multiplier()
}
