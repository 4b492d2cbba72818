use super::*;

fn settings() -> CollisionSettings {
    CollisionSettings {
        chunk_size: 16.0,
        resolution_factor: 4,
        min_floor_height: 0.5,
        cache_capacity: 8,
        pool_size: 2,
        cull_distance: 40.0,
        convex: false,
    }
}

fn open_samples() -> SampleGrid {
    SampleGrid::new(17, 1.0)
}

/// A chunk with one blocked sample inside the coarse cell spanning 4..=8.
fn blocked_samples() -> SampleGrid {
    let mut samples = SampleGrid::new(17, 1.0);
    samples.set(6, 6, 0.0, false);
    samples
}

fn c(x: i32, z: i32) -> ChunkCoord {
    ChunkCoord::new(x, z)
}

fn setup(settings: CollisionSettings) -> (CollisionGeometryCache, PhysicsWorld, EventBus) {
    let mut physics = PhysicsWorld::new();
    let events = EventBus::new();
    let cache = CollisionGeometryCache::with_settings(settings, &mut physics, events.clone());
    (cache, physics, events)
}

#[test]
fn test_pool_prefilled_with_disabled_colliders() {
    let (cache, physics, _) = setup(settings());
    assert_eq!(cache.pooled_count(), 2);
    assert_eq!(physics.collider_count(), 2);
    assert_eq!(physics.enabled_collider_count(), 0);
}

#[test]
fn test_navigable_chunk_gets_no_collider() {
    let (mut cache, mut physics, events) = setup(settings());
    let rx = events.subscribe();

    assert!(cache.ensure_collider(c(0, 0), &open_samples(), &mut physics).is_none());

    assert_eq!(cache.active_count(), 0);
    assert_eq!(cache.pooled_count(), 2);
    assert!(cache.cached_mesh(c(0, 0)).is_some_and(CollisionMesh::is_empty));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_blocked_chunk_gets_enabled_collider() {
    let (mut cache, mut physics, events) = setup(settings());
    let rx = events.subscribe();

    let handle = cache.ensure_collider(c(1, 2), &blocked_samples(), &mut physics);

    assert!(handle.is_some());
    assert_eq!(cache.collider_for(c(1, 2)), handle);
    assert_eq!(cache.pooled_count(), 1);
    assert_eq!(physics.collider_count(), 2);
    assert_eq!(physics.enabled_collider_count(), 1);
    assert_eq!(rx.try_recv(), Ok(WorldEvent::ColliderGenerated(c(1, 2))));
}

#[test]
fn test_collider_sits_at_chunk_origin() {
    let (mut cache, mut physics, _) = setup(settings());
    cache.ensure_collider(c(1, 2), &blocked_samples(), &mut physics);
    physics.step();

    let down = Vec3::NEG_Y;
    // Inside the solid cell: local (6, 6) -> world (22, 38). Floor at 0.5.
    let hit = physics.cast_ray(Vec3::new(22.0, 10.0, 38.0), down, 100.0);
    assert!(hit.is_some_and(|t| (t - 9.5).abs() < 1e-3), "hit={hit:?}");
    // Open part of the same chunk.
    assert!(physics.cast_ray(Vec3::new(30.0, 10.0, 46.0), down, 100.0).is_none());
}

#[test]
fn test_repeated_ensure_keeps_handle() {
    let (mut cache, mut physics, events) = setup(settings());
    let rx = events.subscribe();

    let first = cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);
    let second = cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);

    assert_eq!(first, second);
    assert_eq!(cache.pooled_count(), 1);
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn test_remove_returns_handle_to_pool() {
    let (mut cache, mut physics, events) = setup(settings());
    cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);
    let rx = events.subscribe();

    assert!(cache.remove(c(0, 0), &mut physics));
    assert!(!cache.remove(c(0, 0), &mut physics));

    assert_eq!(cache.active_count(), 0);
    assert_eq!(cache.pooled_count(), 2);
    assert_eq!(physics.collider_count(), 2);
    assert_eq!(physics.enabled_collider_count(), 0);
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![WorldEvent::ColliderRemoved(c(0, 0))]);
}

#[test]
fn test_pool_exhaustion_allocates_then_discards() {
    let mut s = settings();
    s.pool_size = 1;
    s.cull_distance = 1_000.0;
    let (mut cache, mut physics, _) = setup(s);

    for x in 0..3 {
        assert!(cache.ensure_collider(c(x, 0), &blocked_samples(), &mut physics).is_some());
    }
    assert_eq!(cache.overflow_allocations(), 2);
    assert_eq!(physics.collider_count(), 3);

    cache.remove_all(&mut physics);
    assert_eq!(cache.pooled_count(), 1);
    assert_eq!(physics.collider_count(), 1);
    assert_eq!(cache.overflow_allocations(), 2);
}

#[test]
fn test_update_culls_distant_colliders() {
    let (mut cache, mut physics, _) = setup(settings());
    cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);
    cache.ensure_collider(c(5, 0), &blocked_samples(), &mut physics);

    // Chunk (0,0) centre is (8, 8); chunk (5,0) centre is (88, 8).
    let culled = cache.update(Vec3::new(8.0, 30.0, 8.0), &mut physics);

    assert_eq!(culled, vec![c(5, 0)]);
    assert!(cache.collider_for(c(0, 0)).is_some());
    assert!(cache.collider_for(c(5, 0)).is_none());
}

#[test]
fn test_activation_out_of_range_is_skipped() {
    let (mut cache, mut physics, _) = setup(settings());
    let observer = Vec3::new(8.0, 0.0, 8.0);
    assert!(
        cache
            .on_chunk_activated(c(9, 9), &blocked_samples(), observer, &mut physics)
            .is_none()
    );
    assert!(
        cache
            .on_chunk_activated(c(1, 0), &blocked_samples(), observer, &mut physics)
            .is_some()
    );
    assert!(cache.on_chunk_deactivated(c(1, 0), &mut physics));
}

#[test]
fn test_mesh_cache_capacity_without_eviction() {
    let mut s = settings();
    s.cache_capacity = 1;
    let (mut cache, mut physics, _) = setup(s);

    cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);
    cache.ensure_collider(c(1, 0), &blocked_samples(), &mut physics);

    assert_eq!(cache.cached_mesh_count(), 1);
    assert!(cache.cached_mesh(c(0, 0)).is_some());
    assert!(cache.cached_mesh(c(1, 0)).is_none());
    assert_eq!(cache.active_count(), 2);
}

#[test]
fn test_shapeless_chunk_is_not_rebuilt_every_tick() {
    let mut s = settings();
    s.cache_capacity = 0;
    let (mut cache, mut physics, _) = setup(s);

    for _ in 0..5 {
        assert!(cache.ensure_collider(c(0, 0), &open_samples(), &mut physics).is_none());
    }
    assert_eq!(cache.mesh_build_count(), 1);
    assert_eq!(cache.cached_mesh_count(), 0);

    // Leaving the window forgets it; the next activation samples afresh.
    cache.on_chunk_deactivated(c(0, 0), &mut physics);
    assert!(cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics).is_some());
    assert_eq!(cache.mesh_build_count(), 2);
}

#[test]
fn test_live_collider_skips_rebuild() {
    let mut s = settings();
    s.cache_capacity = 0;
    let (mut cache, mut physics, _) = setup(s);

    for _ in 0..3 {
        cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);
    }
    assert_eq!(cache.mesh_build_count(), 1);

    cache.clear_cache();
    cache.remove(c(0, 0), &mut physics);
    cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);
    assert_eq!(cache.mesh_build_count(), 2);
}

#[test]
fn test_clear_cache_keeps_live_colliders() {
    let (mut cache, mut physics, _) = setup(settings());
    cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);

    cache.clear_cache();

    assert_eq!(cache.cached_mesh_count(), 0);
    assert!(cache.collider_for(c(0, 0)).is_some());
}

#[test]
fn test_convex_mode_builds_hull() {
    let mut s = settings();
    s.convex = true;
    let (mut cache, mut physics, _) = setup(s);

    let mut samples = open_samples();
    samples.set(1, 1, 2.0, false);
    samples.set(14, 14, 6.0, false);
    assert!(cache.ensure_collider(c(0, 0), &samples, &mut physics).is_some());

    // A flat single quad is degenerate as a hull and falls back to a trimesh.
    assert!(cache.ensure_collider(c(1, 0), &blocked_samples(), &mut physics).is_some());
}

#[test]
fn test_dispose_removes_everything() {
    let (mut cache, mut physics, _) = setup(settings());
    cache.ensure_collider(c(0, 0), &blocked_samples(), &mut physics);

    cache.dispose(&mut physics);

    assert_eq!(physics.collider_count(), 0);
    assert_eq!(cache.pooled_count(), 0);
    assert_eq!(cache.active_count(), 0);
}

#[test]
fn test_new_rejects_invalid_config() {
    let mut config = Config::default();
    config.collision.resolution_factor = 0;
    let mut physics = PhysicsWorld::new();
    assert!(CollisionGeometryCache::new(&config, &mut physics, EventBus::new()).is_err());
    assert_eq!(physics.collider_count(), 0);
}
