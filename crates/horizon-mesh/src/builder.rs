//! Height-grid meshing with a fork/join vertex and index pass.
//!
//! Every output vertex depends only on its own sample and every output index
//! only on its quad position, so both passes write disjoint ranges of the
//! destination buffers. They run concurrently under [`rayon::join`], each as a
//! parallel-for over rows. Normal accumulation needs every triangle and runs
//! after the join with exclusive access to the mesh.

use glam::Vec3;
use horizon_core::SampleGrid;
use rayon::prelude::*;

use crate::color::HeightColors;
use crate::lod::{kept_samples, lod_stride};
use crate::terrain_mesh::{MeshVertex, TerrainMesh};

/// Inputs that stay fixed across builds.
#[derive(Clone, Debug)]
pub struct MeshBuildParams {
    /// Maximum terrain height, used to normalize vertex colours.
    pub height_scale: f32,
    /// Normalized height where the lowland ramp hands over to the highland ramp.
    pub navigable_threshold: f32,
    /// Allow the rayon fork/join path.
    pub parallel: bool,
    /// Grids with fewer output vertices are built sequentially.
    pub min_parallel_vertices: usize,
    /// Colour ramps.
    pub colors: HeightColors,
}

impl Default for MeshBuildParams {
    fn default() -> Self {
        Self {
            height_scale: 40.0,
            navigable_threshold: 0.6,
            parallel: true,
            min_parallel_vertices: 1024,
            colors: HeightColors::default(),
        }
    }
}

/// Builds [`TerrainMesh`]es from sample grids.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    params: MeshBuildParams,
}

impl MeshBuilder {
    /// Creates a builder with the given parameters.
    pub fn new(params: MeshBuildParams) -> Self {
        Self { params }
    }

    /// The builder's parameters.
    pub fn params(&self) -> &MeshBuildParams {
        &self.params
    }

    /// Rebuilds `out` from `grid` at `lod`, reusing its buffers.
    pub fn build(&self, grid: &SampleGrid, lod: u32, out: &mut TerrainMesh) {
        self.build_with(grid, lod, out, |_| {});
    }

    /// Rebuilds `out` and then calls `on_complete` with the finished mesh.
    pub fn build_with(
        &self,
        grid: &SampleGrid,
        lod: u32,
        out: &mut TerrainMesh,
        on_complete: impl FnOnce(&TerrainMesh),
    ) {
        let kept = kept_samples(grid.samples_per_side(), lod_stride(lod));
        let side = kept.len();
        out.clear();
        if side < 2 {
            on_complete(out);
            return;
        }

        let quads = side - 1;
        out.vertices.resize(side * side, MeshVertex::default());
        out.indices.resize(quads * quads * 6, 0);

        let parallel = self.params.parallel && side * side >= self.params.min_parallel_vertices;
        let TerrainMesh { vertices, indices } = out;

        if parallel {
            rayon::join(
                || {
                    vertices
                        .par_chunks_mut(side)
                        .enumerate()
                        .for_each(|(row, dst)| self.fill_vertex_row(grid, &kept, row, dst));
                },
                || {
                    indices
                        .par_chunks_mut(quads * 6)
                        .enumerate()
                        .for_each(|(row, dst)| fill_index_row(side, row, dst));
                },
            );
        } else {
            for (row, dst) in vertices.chunks_mut(side).enumerate() {
                self.fill_vertex_row(grid, &kept, row, dst);
            }
            for (row, dst) in indices.chunks_mut(quads * 6).enumerate() {
                fill_index_row(side, row, dst);
            }
        }

        accumulate_normals(out);
        tracing::trace!(
            lod,
            vertices = out.vertices.len(),
            triangles = out.triangle_count(),
            parallel,
            "terrain mesh built"
        );
        on_complete(out);
    }

    fn fill_vertex_row(&self, grid: &SampleGrid, kept: &[usize], row: usize, dst: &mut [MeshVertex]) {
        let spacing = grid.spacing();
        let last = (kept.len() - 1) as f32;
        let sz = kept[row];
        for (col, vertex) in dst.iter_mut().enumerate() {
            let sx = kept[col];
            let h = grid.height(sx, sz);
            *vertex = MeshVertex {
                position: [sx as f32 * spacing, h, sz as f32 * spacing],
                normal: [0.0; 3],
                uv: [col as f32 / last, row as f32 / last],
                color: self.params.colors.color_for(
                    h,
                    self.params.height_scale,
                    self.params.navigable_threshold,
                ),
            };
        }
    }
}

/// Two counter-clockwise (seen from above) triangles per quad in row `row`.
fn fill_index_row(side: usize, row: usize, dst: &mut [u32]) {
    for (col, quad) in dst.chunks_exact_mut(6).enumerate() {
        let v00 = (row * side + col) as u32;
        let v10 = v00 + 1;
        let v01 = v00 + side as u32;
        let v11 = v01 + 1;
        quad.copy_from_slice(&[v00, v01, v10, v10, v01, v11]);
    }
}

/// Sums unnormalized face normals into each triangle's vertices, then normalizes.
fn accumulate_normals(mesh: &mut TerrainMesh) {
    let mut sums = vec![Vec3::ZERO; mesh.vertices.len()];
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(mesh.vertices[a].position);
        let pb = Vec3::from(mesh.vertices[b].position);
        let pc = Vec3::from(mesh.vertices[c].position);
        let n = (pb - pa).cross(pc - pa);
        sums[a] += n;
        sums[b] += n;
        sums[c] += n;
    }
    for (vertex, sum) in mesh.vertices.iter_mut().zip(sums) {
        vertex.normal = sum.try_normalize().unwrap_or(Vec3::Y).to_array();
    }
}
