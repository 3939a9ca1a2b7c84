#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tile palette that maps classified tile kinds to sprite identifiers.
//!
//! Palettes are loaded from a versioned TOML manifest. A palette may cover
//! only part of the tile vocabulary; [`TilePalette::verify`] reports the
//! first kind a generated grid needs but the palette cannot draw.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use anyhow::{bail, Context, Result};
use delve_core::{TileKind, TileKindGrid};
use thiserror::Error;
use tracing::debug;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Failure raised when a palette cannot draw a tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No sprite is registered for the tile kind.
    #[error("tile palette has no sprite for `{}`", .0.name())]
    MissingTile(TileKind),
}

/// Sprite identifiers keyed by tile kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TilePalette {
    sprites: BTreeMap<TileKind, String>,
}

impl TilePalette {
    /// Loads the palette shipped with the tileset adapter.
    pub fn from_default_manifest() -> Result<Self> {
        Self::from_manifest_str(include_str!("../assets/tileset.toml"))
    }

    /// Loads a palette from the manifest located at the provided path.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read tile palette at {}",
                manifest_path.display()
            )
        })?;
        Self::from_manifest_str(&contents)
            .with_context(|| format!("invalid tile palette at {}", manifest_path.display()))
    }

    /// Parses a palette from manifest contents.
    pub fn from_manifest_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse tile palette toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported tile palette version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut sprites = BTreeMap::new();
        let mut unknown = Vec::new();
        for (name, sprite) in manifest.tiles {
            let Some(kind) = TileKind::from_name(&name) else {
                unknown.push(name);
                continue;
            };
            let _ = sprites.insert(kind, sprite);
        }

        if !unknown.is_empty() {
            unknown.sort();
            bail!("tile palette contains unknown tile kinds: {}", unknown.join(", "));
        }

        debug!(entries = sprites.len(), "tile palette loaded");
        Ok(Self { sprites })
    }

    /// Returns the sprite registered for the tile kind.
    pub fn sprite_for(&self, kind: TileKind) -> Result<&str, PaletteError> {
        self.sprites
            .get(&kind)
            .map(String::as_str)
            .ok_or(PaletteError::MissingTile(kind))
    }

    /// Reports whether the palette has a sprite for the tile kind.
    #[must_use]
    pub fn contains(&self, kind: TileKind) -> bool {
        self.sprites.contains_key(&kind)
    }

    /// Number of tile kinds the palette covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Reports whether the palette covers no tile kinds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Checks that every tile kind used by the grid has a sprite.
    ///
    /// Missing kinds are reported in [`TileKind::ALL`] order.
    pub fn verify(&self, tiles: &TileKindGrid) -> Result<(), PaletteError> {
        let mut used = [false; TileKind::ALL.len()];
        for kind in tiles.iter() {
            used[kind as usize] = true;
        }
        TileKind::ALL
            .into_iter()
            .filter(|kind| used[*kind as usize])
            .try_for_each(|kind| self.sprite_for(kind).map(|_| ()))
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    #[serde(default)]
    tiles: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_covers_every_tile_kind() {
        let palette = TilePalette::from_default_manifest().expect("bundled manifest parses");
        assert_eq!(palette.len(), TileKind::ALL.len());
        for kind in TileKind::ALL {
            assert!(palette.contains(kind), "missing {kind:?}");
        }
        assert_eq!(
            palette.sprite_for(TileKind::EdgeLeft),
            Ok("tiles/edge_left.png")
        );
    }

    #[test]
    fn manifest_rejects_unknown_kinds() {
        let manifest = r#"
            version = 1

            [tiles]
            floor = "floor.png"
            lava = "lava.png"
        "#;
        let error = TilePalette::from_manifest_str(manifest).expect_err("unknown kind");
        assert!(error.to_string().contains("lava"), "{error}");
    }

    #[test]
    fn manifest_rejects_duplicate_keys() {
        let manifest = r#"
            version = 1

            [tiles]
            floor = "floor.png"
            floor = "other.png"
        "#;
        // Repeated keys never reach the palette; the toml parser rejects them.
        let error = TilePalette::from_manifest_str(manifest).expect_err("duplicate key");
        assert!(format!("{error:#}").contains("failed to parse"), "{error:#}");
    }

    #[test]
    fn manifest_rejects_unsupported_version() {
        let manifest = r#"
            version = 2

            [tiles]
            floor = "floor.png"
        "#;
        let error = TilePalette::from_manifest_str(manifest).expect_err("version 2");
        assert!(error.to_string().contains("version 2"), "{error}");
    }

    #[test]
    fn manifest_rejects_unknown_top_level_fields() {
        let manifest = r#"
            version = 1
            sprites = "legacy"
        "#;
        assert!(TilePalette::from_manifest_str(manifest).is_err());
    }

    #[test]
    fn verify_reports_the_first_missing_kind() {
        let manifest = r#"
            version = 1

            [tiles]
            floor = "floor.png"
        "#;
        let palette = TilePalette::from_manifest_str(manifest).expect("partial palette parses");
        let floor_only = TileKindGrid::from_fn(2, 2, |_, _| TileKind::Floor);
        assert_eq!(palette.verify(&floor_only), Ok(()));

        let mixed = TileKindGrid::from_fn(3, 1, |column, _| match column {
            0 => TileKind::StubTopLeft,
            1 => TileKind::Ceiling,
            _ => TileKind::Floor,
        });
        assert_eq!(
            palette.verify(&mixed),
            Err(PaletteError::MissingTile(TileKind::Ceiling))
        );
    }

    #[test]
    fn missing_tile_error_names_the_kind() {
        let error = PaletteError::MissingTile(TileKind::CornerBottomRight);
        assert_eq!(
            error.to_string(),
            "tile palette has no sprite for `corner_bottom_right`"
        );
    }

    #[test]
    fn missing_manifest_file_is_reported_with_path() {
        let error = TilePalette::from_manifest_path("does/not/exist.toml").expect_err("missing");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}
