use crate::BiomeId;

/// Per-coordinate terrain queries consumed by streaming, navigation and collision.
///
/// Implementations must be deterministic: the same position always yields the
/// same answer for the lifetime of the oracle.
pub trait TerrainOracle: Send + Sync {
    /// Terrain height at world position `(x, z)`.
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Whether an agent may stand at world position `(x, z)`.
    fn is_navigable_at(&self, x: f32, z: f32) -> bool;

    /// Biome at world position `(x, z)`.
    fn biome_at(&self, x: f32, z: f32) -> BiomeId;

    /// Whether the world has finished generating and may be queried.
    fn is_world_generated(&self) -> bool {
        true
    }
}
