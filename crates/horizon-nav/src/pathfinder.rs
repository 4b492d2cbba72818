//! Path queries: endpoint validation, caching, search dispatch and smoothing.

use glam::Vec3;
use horizon_config::{Config, SearchAlgorithm};
use horizon_core::{EventBus, GridCoord, ObstructionProbe, WorldEvent};
use horizon_terrain::{BiomeCostTable, TerrainOracle};
use rustc_hash::FxHashMap;

use crate::error::{NavigationError, PathFailure};
use crate::grid::{NavSettings, NavigationGrid};
use crate::path::Path;
use crate::search::{self, SearchResult};
use crate::smoothing::smooth_path;

/// Answers path queries over a [`NavigationGrid`].
///
/// Successful results are cached per `(start cell, goal cell)` until the
/// cache reaches capacity; after that new results are returned but not
/// stored. The cache is only cleared explicitly or by regeneration.
pub struct Pathfinder {
    settings: NavSettings,
    costs: BiomeCostTable,
    grid: NavigationGrid,
    cache: FxHashMap<(GridCoord, GridCoord), Path>,
    searches: u64,
    events: EventBus,
}

impl Pathfinder {
    /// Creates a pathfinder with an ungenerated grid.
    pub fn new(
        config: &Config,
        costs: BiomeCostTable,
        events: EventBus,
    ) -> Result<Self, NavigationError> {
        config.validate()?;
        Ok(Self::with_settings(
            NavSettings::from_config(config),
            costs,
            events,
        ))
    }

    /// Creates a pathfinder from already-resolved settings.
    pub fn with_settings(settings: NavSettings, costs: BiomeCostTable, events: EventBus) -> Self {
        Self {
            settings,
            costs,
            grid: NavigationGrid::new(),
            cache: FxHashMap::default(),
            searches: 0,
            events,
        }
    }

    /// Builds the grid from `terrain`, or a degraded grid if the terrain
    /// is not generated yet. Clears the path cache.
    pub fn generate(&mut self, terrain: &dyn TerrainOracle, probe: &dyn ObstructionProbe) {
        if terrain.is_world_generated() {
            self.grid
                .generate(&self.settings, terrain, probe, &self.costs);
        } else {
            self.grid.generate_degraded(&self.settings);
        }
        self.clear_cache();
    }

    /// Builds a degraded grid (no terrain). Clears the path cache.
    pub fn generate_degraded(&mut self) {
        self.grid.generate_degraded(&self.settings);
        self.clear_cache();
    }

    /// Finds a path between two world positions.
    ///
    /// Publishes [`WorldEvent::PathCalculated`] with the waypoints, or with
    /// an empty list on failure.
    pub fn calculate_path(
        &mut self,
        start: Vec3,
        end: Vec3,
        probe: &dyn ObstructionProbe,
    ) -> Result<Path, PathFailure> {
        let result = self.find(start, end, probe);
        let waypoints = match &result {
            Ok(path) => path.waypoints.clone(),
            Err(failure) => {
                tracing::debug!("No path from {} to {}: {}", start, end, failure);
                Vec::new()
            }
        };
        self.events.publish(WorldEvent::PathCalculated(waypoints));
        result
    }

    fn find(
        &mut self,
        start: Vec3,
        end: Vec3,
        probe: &dyn ObstructionProbe,
    ) -> Result<Path, PathFailure> {
        if !self.grid.is_generated() {
            return Err(PathFailure::GridNotGenerated);
        }

        let start_cell = self.grid.world_to_grid(start);
        let goal_cell = self.grid.world_to_grid(end);
        if !self.grid.in_bounds(start_cell) || !self.grid.in_bounds(goal_cell) {
            return Err(PathFailure::OutOfBounds);
        }
        let start_cell = self.grid.clamp(start_cell);
        let goal_cell = self.grid.clamp(goal_cell);

        let key = (start_cell, goal_cell);
        if let Some(path) = self.cache.get(&key) {
            tracing::trace!("Path cache hit {} -> {}", start_cell, goal_cell);
            return Ok(path.clone());
        }

        if !self.grid.is_walkable(start_cell) {
            return Err(PathFailure::StartNotNavigable);
        }
        if !self.grid.is_walkable(goal_cell) {
            return Err(PathFailure::GoalNotNavigable);
        }
        let (Some(s), Some(g)) = (self.grid.index(start_cell), self.grid.index(goal_cell)) else {
            return Err(PathFailure::OutOfBounds);
        };

        self.searches += 1;
        let SearchResult { nodes, cost } = match self.settings.algorithm {
            SearchAlgorithm::AStar => {
                search::a_star(&mut self.grid, s, g, self.settings.max_open_set)
            }
            SearchAlgorithm::Dijkstra => search::dijkstra(&mut self.grid, s, g),
        }?;

        let raw: Vec<Vec3> = nodes
            .iter()
            .map(|&i| self.grid.nodes()[i].position)
            .collect();
        let waypoints = if self.settings.smooth_paths {
            smooth_path(&self.grid, probe, &raw, self.settings.agent_radius)
        } else {
            raw
        };
        let path = Path { waypoints, cost };

        if self.cache.len() < self.settings.path_cache_capacity {
            self.cache.insert(key, path.clone());
        }
        Ok(path)
    }

    /// Switches the search algorithm. Cached paths are kept.
    pub fn set_algorithm(&mut self, algorithm: SearchAlgorithm) {
        self.settings.algorithm = algorithm;
    }

    /// Enables or disables smoothing for future searches.
    pub fn set_smoothing(&mut self, enabled: bool) {
        self.settings.smooth_paths = enabled;
    }

    /// Drops every cached path.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached paths.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of searches actually run (cache hits and rejected queries excluded).
    pub fn search_count(&self) -> u64 {
        self.searches
    }

    /// The navigation grid.
    pub fn grid(&self) -> &NavigationGrid {
        &self.grid
    }

    /// Mutable access to the grid, e.g. to mark cells blocked at runtime.
    ///
    /// Cached paths are not invalidated; call [`clear_cache`](Self::clear_cache).
    pub fn grid_mut(&mut self) -> &mut NavigationGrid {
        &mut self.grid
    }

    /// Resolved settings.
    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }
}

#[cfg(test)]
#[path = "pathfinder_tests.rs"]
mod tests;
