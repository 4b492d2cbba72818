//! Procedural reference terrain: fBm heights, threshold navigability, and a
//! second low-frequency noise field for biomes.

use horizon_config::WorldConfig;
use noise::{NoiseFn, Simplex};

use crate::{BiomeId, HeightmapParams, HeightmapSampler, TerrainOracle};

const BIOME_FREQUENCY: f64 = 0.008;

/// Noise-driven terrain oracle.
///
/// Height is `normalized_fbm × height_scale`; a position is navigable when its
/// normalized height is below the navigability threshold.
pub struct NoiseTerrain {
    heights: HeightmapSampler,
    biomes: Simplex,
    height_scale: f32,
    threshold: f32,
}

impl NoiseTerrain {
    /// Creates the terrain described by `world`.
    pub fn new(world: &WorldConfig) -> Self {
        Self::with_params(
            HeightmapParams {
                seed: world.seed,
                ..Default::default()
            },
            world.height_scale,
            world.navigable_height_threshold,
        )
    }

    /// Creates terrain with explicit fBm parameters.
    pub fn with_params(params: HeightmapParams, height_scale: f32, threshold: f32) -> Self {
        let biomes = Simplex::new(params.seed.wrapping_add(1));
        Self {
            heights: HeightmapSampler::new(params),
            biomes,
            height_scale,
            threshold,
        }
    }

    /// Normalized height in `[0, 1]` at `(x, z)`.
    pub fn normalized_height(&self, x: f32, z: f32) -> f32 {
        self.heights.sample_normalized(x as f64, z as f64) as f32
    }
}

impl TerrainOracle for NoiseTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.normalized_height(x, z) * self.height_scale
    }

    fn is_navigable_at(&self, x: f32, z: f32) -> bool {
        self.normalized_height(x, z) < self.threshold
    }

    fn biome_at(&self, x: f32, z: f32) -> BiomeId {
        let h = self.normalized_height(x, z);
        if h < self.threshold * 0.25 {
            return BiomeId::REEF;
        }
        let v = self
            .biomes
            .get([x as f64 * BIOME_FREQUENCY, z as f64 * BIOME_FREQUENCY]);
        if v < -0.3 {
            BiomeId::CANYON
        } else if v > 0.4 {
            BiomeId::RUGGED
        } else {
            BiomeId::PLAIN
        }
    }
}
