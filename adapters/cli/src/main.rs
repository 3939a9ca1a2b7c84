#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, prints and shares Delve dungeons.

mod config;
mod layout_transfer;
mod plan;
mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use delve_core::{Command, Event, Settings};
use delve_tileset::TilePalette;
use delve_world::{self as world, query, Dungeon, Layout};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{config::SettingsOverrides, layout_transfer::LayoutSnapshot, plan::PopulationLog};

/// Procedural dungeon generator.
#[derive(Debug, Parser)]
#[command(name = "delve", version, about = "Grow, rasterize and autotile dungeons")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Generate a dungeon and print it as text.
    Generate(GenerateArgs),
    /// Decode a layout string and check it against a fresh regeneration.
    Inspect {
        /// Layout string produced by `generate --export`.
        layout: String,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Seed of the random stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file providing generation settings.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Number of branch rooms to grow.
    #[arg(long)]
    room_count: Option<u32>,
    /// Smallest room edge in cells.
    #[arg(long)]
    min_size: Option<u32>,
    /// Largest room edge in cells.
    #[arg(long)]
    max_size: Option<u32>,
    /// Hallway width in cells.
    #[arg(long)]
    hall_width: Option<u32>,
    /// Enemy population to plan for.
    #[arg(long)]
    avg_enemies: Option<u32>,
    /// Tile palette manifest used to validate the generated tiles.
    #[arg(long)]
    palette: Option<PathBuf>,
    /// Print the population plan.
    #[arg(long)]
    population: bool,
    /// Print a shareable layout string.
    #[arg(long)]
    export: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            room_count: self.room_count,
            room_min_size: self.min_size,
            room_max_size: self.max_size,
            hall_width: self.hall_width,
            avg_enemies: self.avg_enemies,
        }
    }
}

/// Entry point for the Delve command-line interface.
fn main() -> Result<()> {
    init_tracing();
    match Cli::parse().command {
        CliCommand::Generate(args) => generate(&args),
        CliCommand::Inspect { layout } => inspect(&layout),
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("delve=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let settings = config::resolve(args.settings.as_deref(), args.overrides())?;
    let palette = match &args.palette {
        Some(path) => TilePalette::from_manifest_path(path)?,
        None => TilePalette::from_default_manifest()?,
    };

    let mut dungeon = Dungeon::new();
    let mut events = Vec::new();
    world::try_regenerate(
        &mut dungeon,
        settings,
        args.seed,
        |tiles| palette.verify(tiles),
        &mut events,
    )
    .context("generated layout cannot be drawn with the tile palette")?;

    for event in &events {
        if let Event::GrowthTruncated {
            requested,
            generated,
        } = event
        {
            println!("note: growth stopped after {generated} of {requested} rooms");
        }
    }

    let layout = query::layout(&dungeon).context("regeneration published no layout")?;
    print!("{}", render::ascii(layout.tiles(), layout.spawn().cell));
    print_summary(layout);
    let export = args.export.then(|| LayoutSnapshot::from_layout(layout).encode());

    if args.population {
        let mut log = PopulationLog::default();
        let report = world::populate(&mut dungeon, &mut log)
            .context("population requires a generated layout")?;
        println!(
            "population: {} passes, {} weapons, {} lucky items, {} enemies",
            report.passes, report.weapon_pickups, report.lucky_pickups, report.enemies
        );
        for entry in log.entries() {
            println!("  {entry}");
        }
    }

    if let Some(encoded) = export {
        println!("{encoded}");
    }
    Ok(())
}

fn print_summary(layout: &Layout) {
    let spawn = layout.spawn();
    println!(
        "seed {}: {} rooms, {} hallways, {}x{} tiles",
        layout.seed(),
        layout.rooms().len(),
        layout.hallways().len(),
        layout.tiles().columns(),
        layout.tiles().rows()
    );
    println!(
        "spawn: room {} at cell ({}, {}) / world ({:.2}, {:.2})",
        spawn.room, spawn.cell.0, spawn.cell.1, spawn.world.x, spawn.world.y
    );
}

fn inspect(value: &str) -> Result<()> {
    let snapshot = LayoutSnapshot::decode(value).context("invalid layout string")?;
    println!(
        "layout {}x{} seed {} with {} rooms",
        snapshot.columns,
        snapshot.rows,
        snapshot.seed,
        snapshot.rooms.len()
    );

    let rebuilt = regenerate(snapshot.settings.clone(), snapshot.seed);
    let Some(layout) = query::layout(&rebuilt) else {
        bail!("regeneration published no layout");
    };
    let dimensions = (layout.tiles().columns(), layout.tiles().rows());
    if dimensions != (snapshot.columns, snapshot.rows)
        || layout.rooms() != snapshot.rooms.as_slice()
    {
        bail!("layout does not match a regeneration from its seed and settings");
    }

    for (index, room) in snapshot.rooms.iter().enumerate() {
        println!(
            "  room {index:>3}: ({:>3}, {:>3}) {}x{}{}",
            room.x(),
            room.y(),
            room.width(),
            room.height(),
            if room.should_spawn_enemies() {
                ""
            } else {
                " spawn"
            }
        );
    }
    println!("layout matches regeneration");
    Ok(())
}

fn regenerate(settings: Settings, seed: u64) -> Dungeon {
    let mut dungeon = Dungeon::new();
    world::apply(
        &mut dungeon,
        Command::Regenerate { settings, seed },
        &mut Vec::new(),
    );
    dungeon
}
