//! Terrain mesh generation from per-chunk height samples.
//!
//! A [`MeshBuilder`] turns a [`SampleGrid`](horizon_core::SampleGrid) into a
//! [`TerrainMesh`]: one vertex per kept sample (decimated by LOD), two
//! triangles per quad, height-ramp vertex colours and smooth normals. Vertex
//! and index generation are independent and run as a rayon fork/join.

mod builder;
mod color;
mod lod;
mod terrain_mesh;

pub use builder::{MeshBuildParams, MeshBuilder};
pub use color::{ColorRamp, HeightColors};
pub use lod::{kept_samples, lod_stride};
pub use terrain_mesh::{MeshVertex, TerrainMesh};
