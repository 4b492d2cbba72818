//! Uniform navigation grid sampled from the terrain oracle.

use glam::Vec3;
use horizon_config::{Config, SearchAlgorithm};
use horizon_core::{GridCoord, ObstructionProbe};
use horizon_terrain::{BiomeCostTable, TerrainOracle};

use crate::node::NavigationNode;

/// Navigation parameters resolved from [`Config`].
#[derive(Clone, Debug, PartialEq)]
pub struct NavSettings {
    /// Edge length of a cell in world units.
    pub cell_size: f32,
    /// World extent covered along X.
    pub extent_x: f32,
    /// World extent covered along Z.
    pub extent_z: f32,
    /// Free height required above a cell.
    pub clearance_height: f32,
    /// Agent radius for line-of-sight sweeps.
    pub agent_radius: f32,
    /// A* open-set bound.
    pub max_open_set: usize,
    /// Maximum cached paths.
    pub path_cache_capacity: usize,
    /// Search algorithm.
    pub algorithm: SearchAlgorithm,
    /// Whether paths are smoothed.
    pub smooth_paths: bool,
}

impl NavSettings {
    /// Resolves settings from the world and navigation sections.
    pub fn from_config(config: &Config) -> Self {
        let nav = &config.navigation;
        Self {
            cell_size: nav.cell_size,
            extent_x: config.world.extent_x(),
            extent_z: config.world.extent_z(),
            clearance_height: nav.clearance_height,
            agent_radius: nav.agent_radius,
            max_open_set: nav.max_open_set,
            path_cache_capacity: nav.path_cache_capacity,
            algorithm: nav.algorithm,
            smooth_paths: nav.smooth_paths,
        }
    }

    /// Cells along X: `floor(extent_x / cell_size) + 1`.
    pub fn cells_x(&self) -> usize {
        (self.extent_x / self.cell_size).floor() as usize + 1
    }

    /// Cells along Z: `floor(extent_z / cell_size) + 1`.
    pub fn cells_z(&self) -> usize {
        (self.extent_z / self.cell_size).floor() as usize + 1
    }
}

/// Row-major grid of [`NavigationNode`]s.
#[derive(Clone, Debug, Default)]
pub struct NavigationGrid {
    width: usize,
    length: usize,
    cell_size: f32,
    nodes: Vec<NavigationNode>,
    generated: bool,
    degraded: bool,
}

impl NavigationGrid {
    /// Creates an ungenerated grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every node from the terrain.
    ///
    /// Navigable cells get their biome cost; cells with an obstruction within
    /// `clearance_height` above them are marked non-navigable.
    pub fn generate(
        &mut self,
        settings: &NavSettings,
        terrain: &dyn TerrainOracle,
        probe: &dyn ObstructionProbe,
        costs: &BiomeCostTable,
    ) {
        self.prepare(settings);
        let mut blocked_by_clearance = 0usize;

        for z in 0..self.length {
            for x in 0..self.width {
                let wx = x as f32 * self.cell_size;
                let wz = z as f32 * self.cell_size;
                let position = Vec3::new(wx, terrain.height_at(wx, wz), wz);
                let mut navigable = terrain.is_navigable_at(wx, wz);
                let mut cost = 1.0;
                if navigable {
                    cost = costs.cost(terrain.biome_at(wx, wz));
                    if probe.is_obstructed_above(position, settings.clearance_height) {
                        navigable = false;
                        blocked_by_clearance += 1;
                    }
                }
                self.nodes.push(NavigationNode::new(
                    GridCoord::new(x as i32, z as i32),
                    position,
                    navigable,
                    cost,
                ));
            }
        }

        self.generated = true;
        self.degraded = false;
        tracing::info!(
            "Navigation grid generated: {}x{} cells, {} navigable, {} blocked by clearance",
            self.width,
            self.length,
            self.navigable_count(),
            blocked_by_clearance
        );
    }

    /// Builds a flat grid where every non-border cell is navigable at cost 1.
    ///
    /// Used when no terrain is available.
    pub fn generate_degraded(&mut self, settings: &NavSettings) {
        self.prepare(settings);
        for z in 0..self.length {
            for x in 0..self.width {
                let border = x == 0 || z == 0 || x + 1 == self.width || z + 1 == self.length;
                self.nodes.push(NavigationNode::new(
                    GridCoord::new(x as i32, z as i32),
                    Vec3::new(x as f32 * self.cell_size, 0.0, z as f32 * self.cell_size),
                    !border,
                    1.0,
                ));
            }
        }
        self.generated = true;
        self.degraded = true;
        tracing::warn!(
            "No terrain available; built degraded {}x{} navigation grid",
            self.width,
            self.length
        );
    }

    fn prepare(&mut self, settings: &NavSettings) {
        self.width = settings.cells_x();
        self.length = settings.cells_z();
        self.cell_size = settings.cell_size;
        self.nodes.clear();
        self.nodes.reserve(self.width * self.length);
    }

    /// Nearest cell to a world position, without clamping.
    pub fn world_to_grid(&self, pos: Vec3) -> GridCoord {
        GridCoord::new(
            (pos.x / self.cell_size).round() as i32,
            (pos.z / self.cell_size).round() as i32,
        )
    }

    /// Clamps a coordinate into the grid.
    pub fn clamp(&self, coord: GridCoord) -> GridCoord {
        GridCoord::new(
            coord.x.clamp(0, self.width.saturating_sub(1) as i32),
            coord.z.clamp(0, self.length.saturating_sub(1) as i32),
        )
    }

    /// Returns `true` if `coord` lies inside the grid.
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.in_bounds(self.width, self.length)
    }

    /// Flat index of an in-bounds coordinate.
    pub fn index(&self, coord: GridCoord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| coord.z as usize * self.width + coord.x as usize)
    }

    /// Node at `coord`.
    pub fn node(&self, coord: GridCoord) -> Option<&NavigationNode> {
        self.index(coord).map(|i| &self.nodes[i])
    }

    /// Returns `true` if `coord` is inside the grid and navigable.
    pub fn is_walkable(&self, coord: GridCoord) -> bool {
        self.node(coord).is_some_and(|n| n.navigable)
    }

    /// Overrides a cell's navigability.
    pub fn set_navigable(&mut self, coord: GridCoord, navigable: bool) {
        if let Some(i) = self.index(coord) {
            self.nodes[i].navigable = navigable;
        }
    }

    /// Cells along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells along Z.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Whether the grid has been generated.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether the grid was built without terrain.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Number of navigable cells.
    pub fn navigable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.navigable).count()
    }

    /// All nodes, row-major.
    pub fn nodes(&self) -> &[NavigationNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [NavigationNode] {
        &mut self.nodes
    }

    pub(crate) fn reset_search_state(&mut self) {
        for node in &mut self.nodes {
            node.reset_search();
        }
    }
}
