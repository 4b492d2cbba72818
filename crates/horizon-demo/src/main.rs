//! Headless demo: walks an observer diagonally across a noise world.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p horizon-demo -- --ticks 600 --algorithm dijkstra`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use horizon_config::{CliArgs, Config, default_config_dir};
use horizon_core::WorldEvent;
use horizon_runtime::{Capabilities, WorldContext};
use horizon_terrain::{NoiseTerrain, TerrainOracle, spawn_bake};
use tracing::{info, warn};

const DEFAULT_TICKS: u32 = 600;

/// Ticks between path queries.
const PATH_QUERY_INTERVAL: u32 = 60;

/// How far ahead of the observer path queries aim, in world units.
const PATH_LOOKAHEAD: f32 = 48.0;

/// Longest the demo blocks on the terrain bake before it starts ticking.
const BAKE_TIMEOUT: Duration = Duration::from_secs(60);

/// Counts events by kind.
#[derive(Debug, Default)]
struct EventTally {
    chunks_activated: usize,
    chunks_deactivated: usize,
    colliders_generated: usize,
    colliders_removed: usize,
    paths_found: usize,
    paths_failed: usize,
}

impl EventTally {
    fn record(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::ChunkActivated(_) => self.chunks_activated += 1,
            WorldEvent::ChunkDeactivated(_) => self.chunks_deactivated += 1,
            WorldEvent::ColliderGenerated(_) => self.colliders_generated += 1,
            WorldEvent::ColliderRemoved(_) => self.colliders_removed += 1,
            WorldEvent::PathCalculated(w) if w.is_empty() => self.paths_failed += 1,
            WorldEvent::PathCalculated(_) => self.paths_found += 1,
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".horizon"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    horizon_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let ticks = args.ticks.unwrap_or(DEFAULT_TICKS);
    match run(config, ticks) {
        Ok(tally) => {
            info!("Demo finished: {:?}", tally);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config, ticks: u32) -> Result<EventTally, horizon_runtime::RuntimeError> {
    let extent_x = config.world.extent_x();
    let extent_z = config.world.extent_z();
    let source: Arc<dyn TerrainOracle> = Arc::new(NoiseTerrain::new(&config.world));

    // Bake the noise on a worker so the context starts out awaiting terrain.
    let samples_x = extent_x as usize + 1;
    let samples_z = extent_z as usize + 1;
    let mut ctx = match spawn_bake(Arc::clone(&source), samples_x, samples_z, 1.0) {
        Ok(bake) => {
            let terrain: Arc<dyn TerrainOracle> = bake.terrain;
            WorldContext::new(config, terrain, Capabilities::ALL)?.with_ready_signal(bake.ready)
        }
        Err(e) => {
            warn!("Could not start terrain bake ({e}); sampling noise directly");
            WorldContext::new(config, source, Capabilities::ALL)?
        }
    };
    let events = ctx.subscribe();
    let mut tally = EventTally::default();

    let wait_start = Instant::now();
    if ctx.wait_ready(BAKE_TIMEOUT) {
        info!("Terrain ready after {:.1?}", wait_start.elapsed());
    } else {
        warn!(
            "Terrain not ready after {:.1?}; ticks idle until it is",
            wait_start.elapsed()
        );
    }

    let start = Vec3::new(extent_x * 0.1, 0.0, extent_z * 0.1);
    let end = Vec3::new(extent_x * 0.9, 0.0, extent_z * 0.9);
    let heading = (end - start).normalize_or_zero();

    for tick in 0..ticks {
        let t = tick as f32 / ticks.max(1) as f32;
        let mut observer = start.lerp(end, t);
        observer.y = ctx.height_at(observer);

        if let Some(delta) = ctx.tick(observer) {
            info!(
                "Tick {}: observer entered new chunk (+{} -{} remeshed {})",
                tick,
                delta.activated.len(),
                delta.deactivated.len(),
                delta.remeshed.len()
            );
        }

        if tick % PATH_QUERY_INTERVAL == 0 {
            let target = observer + heading * PATH_LOOKAHEAD;
            match ctx.find_path(observer, target) {
                Ok(path) => info!(
                    "Path: {} waypoints, length {:.1}, cost {:.1}",
                    path.len(),
                    path.length(),
                    path.cost
                ),
                Err(failure) => info!("No path from {} to {}: {}", observer, target, failure),
            }
        }

        for event in events.try_iter() {
            tally.record(&event);
        }
    }

    if let Some(cache) = ctx.collision() {
        info!(
            "Collision: {} live colliders, {} cached meshes, {} overflow allocations",
            cache.active_count(),
            cache.cached_mesh_count(),
            cache.overflow_allocations()
        );
    }
    let streamer = ctx.streamer();
    info!(
        "Streaming: {} active, {} inactive, {} pooled, {} overflow allocations",
        streamer.active_count(),
        streamer.inactive_count(),
        streamer.pooled_count(),
        streamer.overflow_allocations()
    );

    ctx.dispose();
    for event in events.try_iter() {
        tally.record(&event);
    }
    Ok(tally)
}
