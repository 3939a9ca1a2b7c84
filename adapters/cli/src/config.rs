use std::{fs, path::Path};

use anyhow::{Context, Result};
use delve_core::Settings;
use tracing::debug;

const DEFAULT_ROOM_MIN_SIZE: u32 = 4;
const DEFAULT_ROOM_MAX_SIZE: u32 = 10;
const DEFAULT_ROOM_COUNT: u32 = 12;
const DEFAULT_HALL_WIDTH: u32 = 2;
const DEFAULT_AVG_ENEMIES: u32 = 8;

/// Command-line values that replace the corresponding settings fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SettingsOverrides {
    pub(crate) room_count: Option<u32>,
    pub(crate) room_min_size: Option<u32>,
    pub(crate) room_max_size: Option<u32>,
    pub(crate) hall_width: Option<u32>,
    pub(crate) avg_enemies: Option<u32>,
}

/// Loads settings from an optional TOML file and applies the overrides.
///
/// Validation runs once, after the overrides have been merged.
pub(crate) fn resolve(path: Option<&Path>, overrides: SettingsOverrides) -> Result<Settings> {
    let base = match path {
        Some(path) => load(path)?,
        None => Settings::new(
            DEFAULT_ROOM_MIN_SIZE,
            DEFAULT_ROOM_MAX_SIZE,
            DEFAULT_ROOM_COUNT,
            DEFAULT_HALL_WIDTH,
            DEFAULT_AVG_ENEMIES,
        )
        .context("built-in settings are invalid")?,
    };

    let merged = Settings::new(
        overrides.room_min_size.unwrap_or(base.room_min_size()),
        overrides.room_max_size.unwrap_or(base.room_max_size()),
        overrides.room_count.unwrap_or(base.room_count()),
        overrides.hall_width.unwrap_or(base.hall_width()),
        overrides.avg_enemies.unwrap_or(base.avg_enemies()),
    )
    .context("invalid settings after applying command-line overrides")?;

    Ok(merged
        .with_enemy_health(base.enemy_health())
        .with_rarity_rolls(base.rarity_rolls())
        .with_theme(base.theme().clone()))
}

fn load(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings at {}", path.display()))?;
    let settings: Settings = toml::from_str(&contents)
        .with_context(|| format!("failed to parse settings at {}", path.display()))?;
    debug!(path = %path.display(), "settings file loaded");
    Ok(settings)
}
