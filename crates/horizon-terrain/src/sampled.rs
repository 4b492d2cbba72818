//! Terrain defined by explicit sample arrays.

use crate::{BiomeId, TerrainOracle};

/// A terrain oracle backed by a regular grid of samples.
///
/// Sample `(ix, iz)` sits at world position `(ix × spacing, iz × spacing)`.
/// Queries snap to the nearest sample and clamp to the grid edge.
#[derive(Clone, Debug)]
pub struct SampledTerrain {
    width: usize,
    length: usize,
    spacing: f32,
    heights: Vec<f32>,
    navigable: Vec<bool>,
    biomes: Vec<BiomeId>,
    generated: bool,
}

impl SampledTerrain {
    /// Flat, fully navigable plain terrain.
    pub fn flat(width: usize, length: usize, spacing: f32, height: f32) -> Self {
        let count = width * length;
        Self {
            width,
            length,
            spacing,
            heights: vec![height; count],
            navigable: vec![true; count],
            biomes: vec![BiomeId::PLAIN; count],
            generated: true,
        }
    }

    /// Builds every sample from `f(world_x, world_z) -> (height, navigable, biome)`.
    pub fn from_fn(
        width: usize,
        length: usize,
        spacing: f32,
        mut f: impl FnMut(f32, f32) -> (f32, bool, BiomeId),
    ) -> Self {
        let mut terrain = Self::flat(width, length, spacing, 0.0);
        for iz in 0..length {
            for ix in 0..width {
                let (h, nav, biome) = f(ix as f32 * spacing, iz as f32 * spacing);
                let i = iz * width + ix;
                terrain.heights[i] = h;
                terrain.navigable[i] = nav;
                terrain.biomes[i] = biome;
            }
        }
        terrain
    }

    /// Samples along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Samples along Z.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Distance between samples.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Overrides the height of one sample.
    pub fn set_height(&mut self, ix: usize, iz: usize, height: f32) {
        let i = iz * self.width + ix;
        self.heights[i] = height;
    }

    /// Overrides the navigability of one sample.
    pub fn set_navigable(&mut self, ix: usize, iz: usize, navigable: bool) {
        let i = iz * self.width + ix;
        self.navigable[i] = navigable;
    }

    /// Overrides the biome of one sample.
    pub fn set_biome(&mut self, ix: usize, iz: usize, biome: BiomeId) {
        let i = iz * self.width + ix;
        self.biomes[i] = biome;
    }

    /// Marks whether the terrain reports itself as generated.
    pub fn with_generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }

    fn index(&self, x: f32, z: f32) -> Option<usize> {
        if self.width == 0 || self.length == 0 {
            return None;
        }
        let ix = (x / self.spacing).round().clamp(0.0, (self.width - 1) as f32) as usize;
        let iz = (z / self.spacing).round().clamp(0.0, (self.length - 1) as f32) as usize;
        Some(iz * self.width + ix)
    }
}

impl TerrainOracle for SampledTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.index(x, z).map_or(0.0, |i| self.heights[i])
    }

    fn is_navigable_at(&self, x: f32, z: f32) -> bool {
        self.index(x, z).is_some_and(|i| self.navigable[i])
    }

    fn biome_at(&self, x: f32, z: f32) -> BiomeId {
        self.index(x, z).map_or(BiomeId::default(), |i| self.biomes[i])
    }

    fn is_world_generated(&self) -> bool {
        self.generated
    }
}
