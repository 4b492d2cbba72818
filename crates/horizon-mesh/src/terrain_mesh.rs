//! Mesh buffers produced by the builder and owned by each chunk.

use bytemuck::{Pod, Zeroable};

/// A single terrain vertex, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local coordinates.
    pub position: [f32; 3],
    /// Smooth vertex normal.
    pub normal: [f32; 3],
    /// Texture coordinates spanning `[0, 1]` across the chunk.
    pub uv: [f32; 2],
    /// Linear RGBA colour.
    pub color: [f32; 4],
}

/// Vertex and triangle-index buffers for one chunk.
///
/// Buffers are cleared and refilled in place on every rebuild so a pooled
/// chunk keeps its allocations across reuse.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (3 indices per triangle).
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both buffers, keeping their capacity.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
