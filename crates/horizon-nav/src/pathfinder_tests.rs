use std::cell::Cell;
use std::f32::consts::SQRT_2;

use horizon_core::{NEIGHBOR_OFFSETS, OpenSky};
use horizon_terrain::SampledTerrain;

use super::*;

fn settings(cells: usize, algorithm: SearchAlgorithm, smooth: bool) -> NavSettings {
    let extent = (cells - 1) as f32;
    NavSettings {
        cell_size: 1.0,
        extent_x: extent,
        extent_z: extent,
        algorithm,
        smooth_paths: smooth,
        ..NavSettings::from_config(&Config::default())
    }
}

fn pathfinder_on(terrain: &SampledTerrain, settings: NavSettings) -> Pathfinder {
    let mut pf = Pathfinder::with_settings(settings, BiomeCostTable::default(), EventBus::new());
    pf.generate(terrain, &OpenSky);
    pf
}

fn p(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

/// Counts sweep queries so tests can tell whether smoothing ran.
#[derive(Default)]
struct CountingProbe {
    sweeps: Cell<usize>,
}

impl ObstructionProbe for CountingProbe {
    fn is_obstructed_above(&self, _point: Vec3, _clearance: f32) -> bool {
        false
    }

    fn is_sweep_obstructed(&self, _from: Vec3, _to: Vec3, _radius: f32) -> bool {
        self.sweeps.set(self.sweeps.get() + 1);
        false
    }
}

#[test]
fn test_open_grid_diagonal_scenario() {
    let terrain = SampledTerrain::flat(5, 5, 1.0, 0.0);
    let mut pf = pathfinder_on(&terrain, settings(5, SearchAlgorithm::AStar, false));

    let path = pf.calculate_path(p(0.0, 0.0), p(4.0, 4.0), &OpenSky).unwrap();

    assert_eq!(path.len(), 5);
    assert!((path.cost - 4.0 * SQRT_2).abs() < 1e-4);
    for (i, w) in path.waypoints.iter().enumerate() {
        assert_eq!(*w, p(i as f32, i as f32));
    }
}

#[test]
fn test_a_star_and_dijkstra_agree_on_uniform_grid() {
    let terrain = SampledTerrain::flat(12, 12, 1.0, 0.0);
    let mut astar = pathfinder_on(&terrain, settings(12, SearchAlgorithm::AStar, false));
    let mut dijkstra = pathfinder_on(&terrain, settings(12, SearchAlgorithm::Dijkstra, false));

    for (a, b) in [(p(0.0, 0.0), p(11.0, 5.0)), (p(3.0, 9.0), p(10.0, 1.0))] {
        let x = astar.calculate_path(a, b, &OpenSky).unwrap();
        let y = dijkstra.calculate_path(a, b, &OpenSky).unwrap();
        assert!((x.cost - y.cost).abs() < 1e-4);
        assert_eq!(x.start(), y.start());
        assert_eq!(x.goal(), y.goal());
    }
}

#[test]
fn test_walled_goal_has_no_path() {
    let mut terrain = SampledTerrain::flat(9, 9, 1.0, 0.0);
    for (dx, dz) in NEIGHBOR_OFFSETS {
        terrain.set_navigable((4 + dx) as usize, (4 + dz) as usize, false);
    }
    for algorithm in [SearchAlgorithm::AStar, SearchAlgorithm::Dijkstra] {
        let mut pf = pathfinder_on(&terrain, settings(9, algorithm, true));
        assert_eq!(
            pf.calculate_path(p(0.0, 0.0), p(4.0, 4.0), &OpenSky),
            Err(PathFailure::Unreachable)
        );
    }
}

#[test]
fn test_repeated_query_hits_cache() {
    let terrain = SampledTerrain::flat(10, 10, 1.0, 0.0);
    let mut pf = pathfinder_on(&terrain, settings(10, SearchAlgorithm::AStar, true));
    let probe = CountingProbe::default();

    let first = pf.calculate_path(p(0.0, 0.0), p(9.0, 4.0), &probe).unwrap();
    let sweeps = probe.sweeps.get();
    // Same cells, slightly different world positions.
    let second = pf.calculate_path(p(0.2, 0.1), p(8.9, 4.3), &probe).unwrap();

    assert_eq!(first.waypoints, second.waypoints);
    assert_eq!(pf.search_count(), 1);
    assert_eq!(probe.sweeps.get(), sweeps);
    assert_eq!(pf.cache_len(), 1);
}

#[test]
fn test_full_cache_stops_storing() {
    let terrain = SampledTerrain::flat(6, 6, 1.0, 0.0);
    let mut s = settings(6, SearchAlgorithm::AStar, false);
    s.path_cache_capacity = 1;
    let mut pf = pathfinder_on(&terrain, s);

    pf.calculate_path(p(0.0, 0.0), p(5.0, 5.0), &OpenSky).unwrap();
    pf.calculate_path(p(0.0, 5.0), p(5.0, 0.0), &OpenSky).unwrap();
    pf.calculate_path(p(0.0, 5.0), p(5.0, 0.0), &OpenSky).unwrap();

    assert_eq!(pf.cache_len(), 1);
    assert_eq!(pf.search_count(), 3);
}

#[test]
fn test_cache_key_distinguishes_direction() {
    let terrain = SampledTerrain::flat(6, 6, 1.0, 0.0);
    let mut pf = pathfinder_on(&terrain, settings(6, SearchAlgorithm::AStar, false));
    let there = pf.calculate_path(p(0.0, 0.0), p(5.0, 2.0), &OpenSky).unwrap();
    let back = pf.calculate_path(p(5.0, 2.0), p(0.0, 0.0), &OpenSky).unwrap();
    assert_eq!(pf.search_count(), 2);
    assert_eq!(there.start(), back.goal());
}

#[test]
fn test_smoothing_preserves_endpoints() {
    let mut terrain = SampledTerrain::flat(10, 10, 1.0, 0.0);
    for z in 0..8 {
        terrain.set_navigable(5, z, false);
    }
    let mut raw_pf = pathfinder_on(&terrain, settings(10, SearchAlgorithm::AStar, false));
    let mut smooth_pf = pathfinder_on(&terrain, settings(10, SearchAlgorithm::AStar, true));

    let raw = raw_pf.calculate_path(p(1.0, 1.0), p(8.0, 1.0), &OpenSky).unwrap();
    let smooth = smooth_pf.calculate_path(p(1.0, 1.0), p(8.0, 1.0), &OpenSky).unwrap();

    assert_eq!(raw.start(), smooth.start());
    assert_eq!(raw.goal(), smooth.goal());
    assert!(smooth.len() <= raw.len());
    assert!(smooth.len() >= 3, "the wall forces at least one turn");
}

#[test]
fn test_out_of_bounds_endpoint() {
    let terrain = SampledTerrain::flat(5, 5, 1.0, 0.0);
    let mut pf = pathfinder_on(&terrain, settings(5, SearchAlgorithm::AStar, false));
    assert_eq!(
        pf.calculate_path(p(0.0, 0.0), p(40.0, 2.0), &OpenSky),
        Err(PathFailure::OutOfBounds)
    );
    assert_eq!(
        pf.calculate_path(p(-3.0, 0.0), p(2.0, 2.0), &OpenSky),
        Err(PathFailure::OutOfBounds)
    );
    assert_eq!(pf.search_count(), 0);
}

#[test]
fn test_non_navigable_endpoints() {
    let mut terrain = SampledTerrain::flat(5, 5, 1.0, 0.0);
    terrain.set_navigable(0, 0, false);
    terrain.set_navigable(4, 4, false);
    let mut pf = pathfinder_on(&terrain, settings(5, SearchAlgorithm::AStar, false));
    assert_eq!(
        pf.calculate_path(p(0.0, 0.0), p(2.0, 2.0), &OpenSky),
        Err(PathFailure::StartNotNavigable)
    );
    assert_eq!(
        pf.calculate_path(p(2.0, 2.0), p(4.0, 4.0), &OpenSky),
        Err(PathFailure::GoalNotNavigable)
    );
}

#[test]
fn test_ungenerated_grid_fails() {
    let mut pf = Pathfinder::with_settings(
        settings(5, SearchAlgorithm::AStar, false),
        BiomeCostTable::default(),
        EventBus::new(),
    );
    assert_eq!(
        pf.calculate_path(p(0.0, 0.0), p(1.0, 1.0), &OpenSky),
        Err(PathFailure::GridNotGenerated)
    );
}

#[test]
fn test_search_bound_is_reported_separately() {
    let terrain = SampledTerrain::flat(30, 30, 1.0, 0.0);
    let mut s = settings(30, SearchAlgorithm::AStar, false);
    s.max_open_set = 3;
    let mut pf = pathfinder_on(&terrain, s);
    assert_eq!(
        pf.calculate_path(p(0.0, 0.0), p(29.0, 29.0), &OpenSky),
        Err(PathFailure::SearchBoundExceeded)
    );
    // Nothing cached on failure.
    assert_eq!(pf.cache_len(), 0);
}

#[test]
fn test_path_events_published() {
    let terrain = SampledTerrain::flat(5, 5, 1.0, 0.0);
    let events = EventBus::new();
    let rx = events.subscribe();
    let mut pf = Pathfinder::with_settings(
        settings(5, SearchAlgorithm::AStar, false),
        BiomeCostTable::default(),
        events,
    );
    pf.generate(&terrain, &OpenSky);

    pf.calculate_path(p(0.0, 0.0), p(2.0, 0.0), &OpenSky).unwrap();
    let _ = pf.calculate_path(p(0.0, 0.0), p(50.0, 0.0), &OpenSky);

    let received: Vec<WorldEvent> = rx.try_iter().collect();
    assert_eq!(
        received,
        vec![
            WorldEvent::PathCalculated(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]),
            WorldEvent::PathCalculated(Vec::new()),
        ]
    );
}

#[test]
fn test_ungenerated_terrain_builds_degraded_grid() {
    let terrain = SampledTerrain::flat(5, 5, 1.0, 0.0).with_generated(false);
    let pf = pathfinder_on(&terrain, settings(5, SearchAlgorithm::AStar, false));
    assert!(pf.grid().is_degraded());
    assert!(!pf.grid().is_walkable(GridCoord::new(0, 0)));
    assert!(pf.grid().is_walkable(GridCoord::new(2, 2)));
}

#[test]
fn test_regeneration_clears_cache() {
    let terrain = SampledTerrain::flat(6, 6, 1.0, 0.0);
    let mut pf = pathfinder_on(&terrain, settings(6, SearchAlgorithm::AStar, false));
    pf.calculate_path(p(0.0, 0.0), p(5.0, 5.0), &OpenSky).unwrap();
    assert_eq!(pf.cache_len(), 1);

    pf.generate(&terrain, &OpenSky);
    assert_eq!(pf.cache_len(), 0);
    pf.calculate_path(p(0.0, 0.0), p(5.0, 5.0), &OpenSky).unwrap();
    assert_eq!(pf.search_count(), 2);
}

#[test]
fn test_biome_cost_raises_path_cost() {
    let mut terrain = SampledTerrain::flat(5, 1, 1.0, 0.0);
    terrain.set_biome(2, 0, horizon_terrain::BiomeId::RUGGED);
    let mut s = settings(5, SearchAlgorithm::Dijkstra, false);
    s.extent_z = 0.0;
    let mut pf = pathfinder_on(&terrain, s);
    let path = pf.calculate_path(p(0.0, 0.0), p(4.0, 0.0), &OpenSky).unwrap();
    // 1 + 3 + 1 + 1
    assert!((path.cost - 6.0).abs() < 1e-5);
}
