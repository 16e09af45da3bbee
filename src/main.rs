//! Isocomposite demo entry point.
//!
//! Loads an asset manifest, spawns every character it lists as a composite
//! entity and runs a fixed number of simulation ticks against a headless
//! surface that logs each draw.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing) and apply CLI overrides
//! 2. Load the JSON manifest into an in-memory asset store
//! 3. Spawn composites (optionally wandering along a random path) and missiles
//! 4. For every tick: update world time, run the systems, render
//! 5. Report played loops and draw counts
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --wander 6 --seed 42
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use isocomposite::components::composite::Composite;
use isocomposite::components::missile::Missile;
use isocomposite::components::mover::{Mover, TilePoint};
use isocomposite::resources::assetstore::{AssetManifest, AssetSource};
use isocomposite::resources::config::DemoConfig;
use isocomposite::resources::worldtime::WorldTime;
use isocomposite::surface::LogSurface;
use isocomposite::systems::composite::{
    composite_advance_system, render_composites, sync_composite_facing_system,
};
use isocomposite::systems::movement::{missile_system, path_movement_system};
use isocomposite::systems::time::update_world_time;

/// Tiles between spawned characters.
const SPAWN_SPACING: i32 = 2;
/// Subtiles a demo missile flies.
const MISSILE_RANGE: f64 = 30.0;

/// Isometric composite animation demo
#[derive(Parser)]
#[command(version, about = "Runs layered character animations headlessly and logs every draw.")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Animation mode, e.g. NU or WL.
    #[arg(long)]
    mode: Option<String>,

    /// Weapon class, e.g. HTH or 1HS.
    #[arg(long)]
    weapon_class: Option<String>,

    /// Abstract facing in [0, 64).
    #[arg(long)]
    direction: Option<usize>,

    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,

    /// Walk every character along a random path of N tile waypoints.
    #[arg(long, value_name = "N")]
    wander: Option<usize>,

    /// Seed for the random paths.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration back to the config file.
    #[arg(long)]
    save_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = DemoConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(weapon_class) = cli.weapon_class {
        config.weapon_class = weapon_class;
    }
    if let Some(direction) = cli.direction {
        config.direction = direction;
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }
    if cli.save_config {
        if let Err(e) = config.save_to_file() {
            error!("{}", e);
        }
    }

    let mut manifest = match AssetManifest::load(&config.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("Failed to load manifest {:?}: {}", config.manifest, e);
            std::process::exit(1);
        }
    };
    let missiles = std::mem::take(&mut manifest.missiles);
    let (store, timing, entities) = manifest.into_parts();
    let assets: Arc<dyn AssetSource> = Arc::new(store);
    let timing = Arc::new(timing);

    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    // --------------- ECS world + entities ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::with_time_scale(config.time_scale));

    for (i, appearance) in entities.into_iter().enumerate() {
        let tile = TilePoint::new(i as i32 * SPAWN_SPACING, 0);
        let start = tile.to_subtile();
        let token = appearance.token.clone();

        let mut composite = Composite::new(
            Arc::new(appearance),
            config.palette.as_str(),
            Arc::clone(&assets),
            Arc::clone(&timing),
        );
        if let Err(e) = composite.set_mode(&config.mode, &config.weapon_class, config.direction) {
            error!("{}: cannot set mode {}{}: {}", token, config.mode, config.weapon_class, e);
        }
        if let Some(speed) = config.speed {
            if let Err(e) = composite.set_speed(speed) {
                error!("{}: cannot set speed: {}", token, e);
            }
        }

        let mut mover = Mover::new(start.x, start.y);
        if let Some(waypoints) = cli.wander {
            let path = random_path(&mut rng, tile, waypoints);
            info!("{} wanders through {:?}", token, path);
            mover.set_path(path, None);
        }

        world.spawn((composite, mover));
    }

    for record in &missiles {
        match Missile::new(0.0, 0.0, record, assets.as_ref(), &config.palette) {
            Ok(mut missile) => {
                let radians = rng.f64() * std::f64::consts::TAU;
                if let Err(e) = missile.set_radians(radians, MISSILE_RANGE, None) {
                    error!("Missile {}: {}", record.name, e);
                    continue;
                }
                world.spawn(missile);
            }
            Err(e) => error!("Missile {}: {}", record.name, e),
        }
    }

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            path_movement_system,
            sync_composite_facing_system,
            composite_advance_system,
            missile_system,
        )
            .chain(),
    );

    // --------------- Main loop ---------------
    let mut surface = LogSurface::new();
    for _ in 0..config.ticks {
        update_world_time(&mut world, config.tick);
        schedule.run(&mut world);
        render_composites(&mut world, &mut surface);
    }

    let elapsed = world.resource::<WorldTime>().elapsed;
    let mut query = world.query::<(&Composite, &Mover)>();
    for (composite, mover) in query.iter(&world) {
        match composite.mode() {
            Some(mode) => info!(
                "{}: {}{} direction {}/{}, {} loops played, at tile {:?}",
                composite.appearance().token,
                mode.animation_mode(),
                mode.weapon_class(),
                mode.direction(),
                mode.direction_count(),
                mode.played_count(),
                mover.tile()
            ),
            None => info!("{}: no active mode", composite.appearance().token),
        }
    }
    info!(
        "Simulated {} ticks ({:.2}s), {} frames drawn",
        config.ticks,
        elapsed,
        surface.draw_count()
    );
}

/// Random walk of `waypoints` neighbouring tiles starting next to `start`.
fn random_path(rng: &mut fastrand::Rng, start: TilePoint, waypoints: usize) -> Vec<TilePoint> {
    let mut current = start;
    let mut path = Vec::with_capacity(waypoints);
    while path.len() < waypoints {
        let next = TilePoint::new(current.x + rng.i32(-1..=1), current.y + rng.i32(-1..=1));
        if next == current {
            continue;
        }
        path.push(next);
        current = next;
    }
    path
}
