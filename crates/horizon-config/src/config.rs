//! Configuration structs with sensible defaults, validation and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World extent and terrain settings.
    pub world: WorldConfig,
    /// Chunk streaming settings.
    pub streaming: StreamingConfig,
    /// Navigation grid and pathfinding settings.
    pub navigation: NavigationConfig,
    /// Collision geometry settings.
    pub collision: CollisionConfig,
    /// Mesh building settings.
    pub mesh: MeshConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World extent and terrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk in world units (also samples per edge minus one).
    pub chunk_size: u32,
    /// World width in chunks.
    pub world_chunks_x: u32,
    /// World length in chunks.
    pub world_chunks_z: u32,
    /// Maximum terrain height in world units.
    pub height_scale: f32,
    /// Normalized height (0..1) below which terrain counts as navigable.
    pub navigable_height_threshold: f32,
    /// Seed for the noise terrain.
    pub seed: u32,
}

/// Chunk streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Square window radius around the observer chunk, in chunks.
    pub render_distance: u32,
    /// Number of chunk instances constructed up front.
    pub initial_pool_size: usize,
    /// Capacity of the inactive-chunk cache.
    pub max_inactive_chunks: usize,
}

/// Search algorithm used by the pathfinder.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
pub enum SearchAlgorithm {
    /// Best-first search guided by the Euclidean heuristic, with an open-set bound.
    #[default]
    AStar,
    /// Uniform-cost search without a heuristic.
    Dijkstra,
}

/// Navigation grid and pathfinding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Edge length of a navigation cell in world units.
    pub cell_size: f32,
    /// Free height required above a cell for it to stay navigable.
    pub clearance_height: f32,
    /// Agent radius used by line-of-sight sweeps during smoothing.
    pub agent_radius: f32,
    /// A* aborts once its open set grows beyond this many entries.
    pub max_open_set: usize,
    /// Maximum number of cached paths (no eviction).
    pub path_cache_capacity: usize,
    /// Which search algorithm to run.
    pub algorithm: SearchAlgorithm,
    /// Drop waypoints that have line of sight to their successor.
    pub smooth_paths: bool,
}

/// Collision geometry configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    /// Downsampling stride applied to the chunk samples.
    pub resolution_factor: u32,
    /// Minimum height of emitted solid cells.
    pub min_floor_height: f32,
    /// Maximum number of memoized collision meshes (no eviction).
    pub cache_capacity: usize,
    /// Number of collider handles kept ready for reuse.
    pub pool_size: usize,
    /// Colliders of chunks farther than this from the observer are removed.
    pub cull_distance: f32,
    /// Use convex hulls instead of exact triangle meshes.
    pub convex: bool,
}

/// Mesh building configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Build vertex and index buffers on the rayon pool.
    pub parallel: bool,
    /// Grids with fewer vertices than this are built sequentially.
    pub min_parallel_vertices: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            world_chunks_x: 10,
            world_chunks_z: 10,
            height_scale: 40.0,
            navigable_height_threshold: 0.6,
            seed: 0,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: 3,
            initial_pool_size: 64,
            max_inactive_chunks: 32,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cell_size: 2.0,
            clearance_height: 2.0,
            agent_radius: 0.5,
            max_open_set: 10_000,
            path_cache_capacity: 256,
            algorithm: SearchAlgorithm::AStar,
            smooth_paths: true,
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            resolution_factor: 4,
            min_floor_height: 0.5,
            cache_capacity: 128,
            pool_size: 32,
            cull_distance: 96.0,
            convex: false,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_vertices: 1024,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Derived values ---

impl WorldConfig {
    /// Chunk edge length as a float.
    pub fn chunk_size_f32(&self) -> f32 {
        self.chunk_size as f32
    }

    /// World extent along X in world units.
    pub fn extent_x(&self) -> f32 {
        self.world_chunks_x as f32 * self.chunk_size as f32
    }

    /// World extent along Z in world units.
    pub fn extent_z(&self) -> f32 {
        self.world_chunks_z as f32 * self.chunk_size as f32
    }
}

// --- Validation ---

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

// NaN fails this too.
fn is_positive(v: f32) -> bool {
    v > 0.0
}

impl Config {
    /// Checks every setting the runtime depends on.
    ///
    /// Returns the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.chunk_size == 0 {
            return Err(invalid("world.chunk_size", "must be greater than zero"));
        }
        if w.world_chunks_x == 0 || w.world_chunks_z == 0 {
            return Err(invalid("world.world_chunks", "world must span at least one chunk"));
        }
        if !is_positive(w.height_scale) {
            return Err(invalid("world.height_scale", "must be positive"));
        }
        if !(0.0..=1.0).contains(&w.navigable_height_threshold) {
            return Err(invalid(
                "world.navigable_height_threshold",
                "must lie within [0, 1]",
            ));
        }

        let n = &self.navigation;
        if !is_positive(n.cell_size) {
            return Err(invalid("navigation.cell_size", "must be positive"));
        }
        if n.clearance_height < 0.0 {
            return Err(invalid("navigation.clearance_height", "must not be negative"));
        }
        if n.agent_radius < 0.0 {
            return Err(invalid("navigation.agent_radius", "must not be negative"));
        }
        if n.max_open_set == 0 {
            return Err(invalid("navigation.max_open_set", "must be greater than zero"));
        }

        let c = &self.collision;
        if c.resolution_factor == 0 {
            return Err(invalid("collision.resolution_factor", "must be greater than zero"));
        }
        if c.min_floor_height < 0.0 {
            return Err(invalid("collision.min_floor_height", "must not be negative"));
        }
        if c.cull_distance < 0.0 {
            return Err(invalid("collision.cull_distance", "must not be negative"));
        }

        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-reads the file: `Some(new_config)` if it differs from `self`, `None` otherwise.
    ///
    /// The runtime never applies a reloaded config on its own; callers pass
    /// it to an explicit regeneration.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config on disk differs from the running config");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
