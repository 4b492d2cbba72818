//! End-to-end scenarios across streaming, collision and navigation.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use horizon_config::Config;
use horizon_core::{ChunkCoord, WorldEvent};
use horizon_nav::PathFailure;
use horizon_runtime::{Capabilities, Lifecycle, WorldContext};
use horizon_terrain::{BiomeId, NoiseTerrain, SampledTerrain, TerrainOracle, spawn_bake};

/// 10×10 chunks of 16 with a blocked strip at x ∈ [80, 84], z ≤ 120.
fn striped_terrain() -> Arc<dyn TerrainOracle> {
    Arc::new(SampledTerrain::from_fn(161, 161, 1.0, |x, z| {
        let blocked = (80.0..=84.0).contains(&x) && z <= 120.0;
        (0.0, !blocked, BiomeId::PLAIN)
    }))
}

fn config() -> Config {
    let mut config = Config::default();
    config.streaming.render_distance = 1;
    config
}

fn chunk_center(x: i32, z: i32) -> Vec3 {
    ChunkCoord::new(x, z).center(16.0)
}

fn coords(range_x: std::ops::RangeInclusive<i32>, range_z: std::ops::RangeInclusive<i32>) -> Vec<ChunkCoord> {
    let mut out = Vec::new();
    for x in range_x {
        for z in range_z.clone() {
            out.push(ChunkCoord::new(x, z));
        }
    }
    out.sort();
    out
}

#[test]
fn test_window_follows_observer() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::STREAMING_ONLY).unwrap();

    let delta = ctx.tick(chunk_center(5, 5)).unwrap();
    assert_eq!(delta.activated, coords(4..=6, 4..=6));
    assert_eq!(ctx.streamer().active_coords(), coords(4..=6, 4..=6));

    // Same chunk: nothing to do.
    assert!(ctx.tick(chunk_center(5, 5) + Vec3::new(3.0, 0.0, 3.0)).is_none());

    let delta = ctx.tick(chunk_center(5, 6)).unwrap();
    assert_eq!(delta.deactivated, coords(4..=6, 4..=4));
    assert_eq!(delta.activated, coords(4..=6, 7..=7));
}

#[test]
fn test_colliders_follow_blocked_chunks() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::ALL).unwrap();
    let rx = ctx.subscribe();

    ctx.tick(chunk_center(5, 5));

    // Chunk x=4 shares its last sample column (x=80) with the strip.
    let cache = ctx.collision().unwrap();
    assert_eq!(cache.active_count(), 6);
    for coord in coords(4..=5, 4..=6) {
        assert!(cache.collider_for(coord).is_some(), "missing collider at {coord}");
    }
    for coord in coords(6..=6, 4..=6) {
        assert!(cache.collider_for(coord).is_none());
    }

    let generated = rx
        .try_iter()
        .filter(|e| matches!(e, WorldEvent::ColliderGenerated(_)))
        .count();
    assert_eq!(generated, 6);
}

#[test]
fn test_steady_ticks_do_not_rebuild_collision_meshes() {
    let mut config = config();
    config.collision.cache_capacity = 0;
    let mut ctx = WorldContext::new(config, striped_terrain(), Capabilities::ALL).unwrap();

    ctx.tick(chunk_center(5, 5));
    let builds = ctx.collision().unwrap().mesh_build_count();
    assert_eq!(builds, 9);

    for step in 1..=5 {
        let wobble = Vec3::new(step as f32, 0.0, -(step as f32));
        assert!(ctx.tick(chunk_center(5, 5) + wobble).is_none());
    }
    let cache = ctx.collision().unwrap();
    assert_eq!(cache.mesh_build_count(), builds);
    assert_eq!(cache.active_count(), 6);
}

#[test]
fn test_leaving_chunks_release_colliders() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::ALL).unwrap();
    ctx.tick(chunk_center(5, 5));
    let rx = ctx.subscribe();

    ctx.tick(chunk_center(8, 5));

    let removed: Vec<ChunkCoord> = rx
        .try_iter()
        .filter_map(|e| match e {
            WorldEvent::ColliderRemoved(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(removed.len(), 6);
    assert_eq!(ctx.collision().unwrap().active_count(), 0);
    // Every handle went back to the pool (default pool size 32).
    assert_eq!(ctx.physics().enabled_collider_count(), 0);
}

#[test]
fn test_path_detours_around_strip() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::ALL).unwrap();
    ctx.tick(chunk_center(5, 5));
    let rx = ctx.subscribe();

    let start = Vec3::new(60.0, 0.0, 88.0);
    let goal = Vec3::new(110.0, 0.0, 88.0);
    let path = ctx.find_path(start, goal).unwrap();

    assert_eq!(path.start(), Some(start));
    assert_eq!(path.goal(), Some(goal));
    assert!(path.cost > 50.0, "cost {} should include the detour", path.cost);
    assert!(path.waypoints.iter().any(|w| w.z > 120.0));
    assert_eq!(rx.try_recv(), Ok(WorldEvent::PathCalculated(path.waypoints.clone())));

    // Second identical query is served from the cache.
    let again = ctx.find_path(start, goal).unwrap();
    assert_eq!(again.waypoints, path.waypoints);
    assert_eq!(ctx.pathfinder().unwrap().search_count(), 1);
}

#[test]
fn test_failed_query_publishes_empty_path() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::ALL).unwrap();
    let rx = ctx.subscribe();

    let result = ctx.find_path(Vec3::new(82.0, 0.0, 40.0), Vec3::new(10.0, 0.0, 10.0));

    assert_eq!(result, Err(PathFailure::StartNotNavigable));
    assert_eq!(rx.try_recv(), Ok(WorldEvent::PathCalculated(Vec::new())));
}

#[test]
fn test_regenerate_rebuilds_derived_state() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::ALL).unwrap();
    ctx.tick(chunk_center(5, 5));
    ctx.find_path(Vec3::new(60.0, 0.0, 88.0), Vec3::new(110.0, 0.0, 88.0))
        .unwrap();

    ctx.regenerate().unwrap();
    assert_eq!(ctx.pathfinder().unwrap().cache_len(), 0);
    assert_eq!(ctx.collision().unwrap().active_count(), 0);
    assert_eq!(ctx.streamer().active_count(), 9);

    // Colliders return on the next tick even without a window change.
    assert!(ctx.tick(chunk_center(5, 5)).is_none());
    assert_eq!(ctx.collision().unwrap().active_count(), 6);
}

#[test]
fn test_dispose_deactivates_everything() {
    let mut ctx = WorldContext::new(config(), striped_terrain(), Capabilities::ALL).unwrap();
    ctx.tick(chunk_center(5, 5));
    let rx = ctx.subscribe();

    ctx.dispose();

    let deactivated = rx
        .try_iter()
        .filter(|e| matches!(e, WorldEvent::ChunkDeactivated(_)))
        .count();
    assert_eq!(deactivated, 9);
    assert_eq!(ctx.lifecycle(), Lifecycle::Disposed);
    assert_eq!(ctx.physics().collider_count(), 0);
    assert_eq!(
        ctx.find_path(Vec3::new(60.0, 0.0, 88.0), Vec3::new(110.0, 0.0, 88.0)),
        Err(PathFailure::GridNotGenerated)
    );
}

#[test]
fn test_background_bake_becomes_ready() {
    let config = config();
    let source: Arc<dyn TerrainOracle> = Arc::new(NoiseTerrain::new(&config.world));
    let bake = spawn_bake(source, 161, 161, 1.0).unwrap();
    let terrain: Arc<dyn TerrainOracle> = bake.terrain.clone();

    let mut ctx = WorldContext::new(config, terrain, Capabilities::ALL)
        .unwrap()
        .with_ready_signal(bake.ready);

    assert!(ctx.wait_ready(Duration::from_secs(30)));
    assert!(ctx.is_ready());
    assert!(ctx.pathfinder().is_some_and(|p| !p.grid().is_degraded()));
    assert!(ctx.tick(chunk_center(2, 2)).is_some());
}
