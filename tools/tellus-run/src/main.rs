//! tellus-run: headless world runner.
//!
//! Builds a demo terrain, loads triggers from a TOML config, runs the world
//! for a number of ticks and prints what happened.
//!
//! Usage:
//!   tellus-run --ticks 500
//!   tellus-run --config tellus.toml --seed 7 --plates 5x4 --json
//!   RUST_LOG=tellus_sim=debug tellus-run --ticks 50

use std::path::PathBuf;
use std::process;

use clap::Parser;
use glam::DVec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tellus_sim::config::ConfigError;
use tellus_sim::core::city::City;
use tellus_sim::core::enums::{EntityKind, Good, Orientation};
use tellus_sim::core::events::{Notification, NotificationKind};
use tellus_sim::core::state::{SnapshotRenderer, WorldSnapshot};
use tellus_sim::factory::{SpawnError, SpawnRequest};
use tellus_sim::save::SaveError;
use tellus_sim::terrain::{BlockLayout, Terrain, TerrainError};
use tellus_sim::{SimConfig, World};

/// Run a Tellus world headless and print its notifications.
#[derive(Parser, Debug)]
#[command(name = "tellus-run")]
struct Args {
    /// TOML config (seed and triggers). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// Plate lattice as COLSxROWS
    #[arg(long, default_value = "4x3", value_parser = parse_lattice)]
    plates: (u32, u32),

    /// Tiles per plate side
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(4..))]
    plate_size: u32,

    /// Print the final snapshot as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write a save file after the last tick
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn parse_lattice(s: &str) -> Result<(u32, u32), String> {
    let (cols, rows) = s
        .split_once('x')
        .ok_or_else(|| format!("expected COLSxROWS, got {s:?}"))?;
    let cols: u32 = cols.parse().map_err(|e| format!("bad column count: {e}"))?;
    let rows: u32 = rows.parse().map_err(|e| format!("bad row count: {e}"))?;
    if cols == 0 || rows == 0 {
        return Err("the lattice needs at least one plate".into());
    }
    Ok((cols, rows))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("tellus-run: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let layout = BlockLayout {
        plates_x: args.plates.0,
        plates_y: args.plates.1,
        plate_size: args.plate_size,
    };
    let mut world = World::new(&config, demo_terrain(layout)?)?;
    populate(&mut world, layout)?;
    info!(ticks = args.ticks, seed = config.seed, "running");

    let mut renderer = TextRenderer::default();
    for _ in 0..args.ticks {
        let report = world.advance_tick();
        if !args.json {
            for notification in &report.notifications {
                println!("{}", describe(notification));
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
    } else {
        world.render(&mut renderer);
    }

    if let Some(path) = &args.save {
        let json = world.save()?.to_json()?;
        std::fs::write(path, json).map_err(|source| RunError::Write {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Plates drift in a slow spiral; every third plate has a volcano at its center.
fn demo_terrain(layout: BlockLayout) -> Result<Terrain, TerrainError> {
    let mut terrain = Terrain::block_layout(layout)?;
    for py in 0..layout.plates_y {
        for px in 0..layout.plates_x {
            let id = layout.plate_id(px, py);
            let angle = f64::from(id.0) * 2.399;
            let speed = 0.5 + f64::from(id.0 % 4) * 0.75;
            terrain.set_movement(id, DVec2::from_angle(angle) * speed)?;
            if id.0 % 3 == 0 {
                terrain.set_volcanic(layout.center(px, py), true)?;
            }
        }
    }
    Ok(terrain)
}

/// One city per lattice row, spread from the tropics to the far north, each
/// with a few workers, a farm, an airport and some wild crops.
fn populate(world: &mut World, layout: BlockLayout) -> Result<(), RunError> {
    for py in 0..layout.plates_y {
        let latitude = -5.0 + f64::from(py) * 20.0;
        let city = world.add_city(
            City::new(format!("City {}", py + 1))
                .with_latitude(latitude)
                .with_export(Good::Grain, 120)
                .with_export(Good::Lumber, 60)
                .with_import(Good::Fruit, 40),
        );
        let origin = layout.origin(0, py);
        let at = |dx: i32, dy: i32| tellus_sim::core::types::TileCoord::new(origin.x + dx, origin.y + dy);

        for dx in 1..=2 {
            world.spawn_kind(EntityKind::Worker, SpawnRequest::new(at(dx, 1), 20).owned_by(city))?;
        }
        world.spawn_kind(EntityKind::Scout, SpawnRequest::new(at(1, 2), 15).owned_by(city))?;
        world.spawn_kind(EntityKind::Farm, SpawnRequest::new(at(3, 1), 60).owned_by(city))?;
        world.spawn_kind(
            EntityKind::Airport,
            SpawnRequest::new(at(1, 3), 80)
                .facing(Orientation::South)
                .owned_by(city),
        )?;
        for dx in 0..layout.plates_x.min(4) as i32 {
            world.spawn_kind(
                EntityKind::Crop,
                SpawnRequest::new(at(dx * layout.plate_size as i32, 0), 10),
            )?;
        }
    }
    Ok(())
}

fn describe(notification: &Notification) -> String {
    let text = match &notification.kind {
        NotificationKind::Earthquake {
            epicenter,
            intensity,
            hits,
        } => format!(
            "earthquake between {} and {} (intensity {intensity:.2}), {} elements hit",
            epicenter.0,
            epicenter.1,
            hits.len()
        ),
        NotificationKind::AshCloud {
            origin,
            plates,
            duration_ticks,
        } => format!(
            "ash cloud from {origin} covers {} plates for {duration_ticks} ticks",
            plates.len()
        ),
        NotificationKind::AshCloudCleared { plate } => format!("ash over {plate} cleared"),
        NotificationKind::Drought {
            city,
            duration_ticks,
        } => format!("drought in {city} for {duration_ticks} ticks"),
        NotificationKind::DroughtEnded { city } => format!("drought in {city} ended"),
        NotificationKind::WorldDidNotEnd { target_tick } => {
            format!("the world was to end at tick {target_tick}; it hasn't ended yet")
        }
        NotificationKind::Flavor { headline, .. } => format!("news: {headline}"),
        NotificationKind::ElementDestroyed { entity, kind } => format!("{kind} {entity} destroyed"),
        NotificationKind::TriggerFailed { trigger, reason } => {
            format!("trigger {trigger} failed: {reason}")
        }
    };
    format!("[{:>6}] {text}", notification.tick)
}

/// Prints a short summary of a snapshot.
#[derive(Default)]
struct TextRenderer {
    last_tick: Option<u64>,
}

impl SnapshotRenderer for TextRenderer {
    fn render(&mut self, snapshot: &WorldSnapshot) {
        if self.last_tick == Some(snapshot.time.tick) {
            return;
        }
        self.last_tick = Some(snapshot.time.tick);

        println!("--- tick {} ---", snapshot.time.tick);
        println!("entities: {}", snapshot.entities.len());
        for kind in EntityKind::ALL {
            let n = snapshot.entities.iter().filter(|e| e.kind == kind).count();
            if n > 0 {
                println!("  {:<8} {n}", kind.to_string());
            }
        }
        let ashed: Vec<String> = snapshot
            .plates
            .iter()
            .filter(|p| p.ash_remaining.is_some())
            .map(|p| p.id.to_string())
            .collect();
        if !ashed.is_empty() {
            println!("under ash: {}", ashed.join(", "));
        }
        for city in &snapshot.cities {
            let drought = city
                .drought_remaining
                .map_or(String::new(), |t| format!(", drought {t} ticks left"));
            let exports: Vec<String> = city.exports.iter().map(|(g, v)| format!("{g:?} {v}")).collect();
            println!("{} exports [{}]{drought}", city.name, exports.join(", "));
        }
    }
}
