//! Terrain sampling collaborators for the Horizon runtime.
//!
//! The runtime never generates terrain itself; it queries a [`TerrainOracle`]
//! for height, navigability and biome at world X/Z positions. This crate
//! defines that interface plus three implementations:
//!
//! - [`NoiseTerrain`]: fBm simplex terrain driven by [`WorldConfig`](horizon_config::WorldConfig).
//! - [`SampledTerrain`]: explicit sample arrays, used by tests and tools.
//! - [`BakedTerrain`]: a snapshot of another oracle computed on a background
//!   thread, reporting readiness through a completion signal.

mod bake;
mod biome;
mod heightmap;
mod noise_terrain;
mod oracle;
mod sampled;

pub use bake::{BakedTerrain, TerrainBake, spawn_bake};
pub use biome::{BiomeCostTable, BiomeId};
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use noise_terrain::NoiseTerrain;
pub use oracle::TerrainOracle;
pub use sampled::SampledTerrain;
