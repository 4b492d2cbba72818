//! Chunk instances and their lifecycle state.

use glam::Vec3;
use horizon_core::{ChunkCoord, SampleGrid};
use horizon_mesh::TerrainMesh;
use horizon_terrain::TerrainOracle;

/// Where a chunk instance currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// In the free pool, not bound to any coordinate.
    Pooled,
    /// In the active window.
    Active,
    /// Recently left the window; kept initialized for cheap reactivation.
    Inactive,
}

/// A streamed square of terrain.
///
/// Sample and mesh buffers are reused every time the instance is recycled.
#[derive(Debug)]
pub struct Chunk {
    id: u64,
    coord: ChunkCoord,
    origin: Vec3,
    samples: SampleGrid,
    lod: u32,
    state: ChunkState,
    mesh: TerrainMesh,
}

impl Chunk {
    /// Creates an uninitialized pooled instance.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            coord: ChunkCoord::default(),
            origin: Vec3::ZERO,
            samples: SampleGrid::default(),
            lod: 0,
            state: ChunkState::Pooled,
            mesh: TerrainMesh::new(),
        }
    }

    /// Binds the instance to `coord` and samples the terrain under it.
    ///
    /// One sample per world unit, `chunk_size + 1` per side.
    pub fn initialize(&mut self, coord: ChunkCoord, chunk_size: u32, terrain: &dyn TerrainOracle) {
        self.coord = coord;
        self.origin = coord.origin(chunk_size as f32);
        self.samples
            .fill_from(chunk_size as usize + 1, 1.0, self.origin, |x, z| {
                (terrain.height_at(x, z), terrain.is_navigable_at(x, z))
            });
    }

    /// Returns the instance to its pooled state, keeping buffer capacity.
    pub fn reset(&mut self) {
        self.state = ChunkState::Pooled;
        self.lod = 0;
        self.mesh.clear();
    }

    /// Stable instance identifier (unique per streamer).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Chunk coordinate the instance is bound to.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space origin (minimum corner).
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Height and navigability samples.
    pub fn samples(&self) -> &SampleGrid {
        &self.samples
    }

    /// Current level of detail.
    pub fn lod(&self) -> u32 {
        self.lod
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Render mesh at the current LOD.
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    pub(crate) fn set_state(&mut self, state: ChunkState) {
        self.state = state;
    }

    pub(crate) fn set_lod(&mut self, lod: u32) {
        self.lod = lod;
    }

    pub(crate) fn mesh_parts(&mut self) -> (&SampleGrid, u32, &mut TerrainMesh) {
        (&self.samples, self.lod, &mut self.mesh)
    }

    /// Height at a world position inside this chunk.
    pub fn height_at(&self, pos: Vec3) -> f32 {
        self.samples
            .height_bilinear(pos.x - self.origin.x, pos.z - self.origin.z)
    }

    /// Navigability at a world position inside this chunk.
    pub fn is_navigable(&self, pos: Vec3) -> bool {
        self.samples
            .navigable_nearest(pos.x - self.origin.x, pos.z - self.origin.z)
    }
}
