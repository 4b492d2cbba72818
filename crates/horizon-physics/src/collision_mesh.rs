//! Coarse collision geometry from chunk samples.

use glam::Vec3;
use horizon_core::SampleGrid;

/// Simplified collision geometry for one chunk, in chunk-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl CollisionMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of solid cells (two triangles each).
    pub fn cell_count(&self) -> usize {
        self.indices.len() / 2
    }

    fn push_quad(&mut self, x0: f32, x1: f32, z0: f32, z1: f32, y: f32) {
        let base = self.vertices.len() as u32;
        self.vertices.extend([
            Vec3::new(x0, y, z0),
            Vec3::new(x1, y, z0),
            Vec3::new(x0, y, z1),
            Vec3::new(x1, y, z1),
        ]);
        let (v00, v10, v01, v11) = (base, base + 1, base + 2, base + 3);
        self.indices.push([v00, v01, v10]);
        self.indices.push([v10, v01, v11]);
    }
}

/// Downsamples `samples` by `resolution_factor` into solid top quads.
///
/// Each coarse cell covers a `stride × stride` block of samples with both
/// edges included, so a sample on a cell boundary counts for every cell that
/// touches it. A cell containing any non-navigable sample becomes a quad at
/// `max(highest sample, min_floor)`; fully navigable cells emit nothing.
pub fn build_collision_mesh(
    samples: &SampleGrid,
    resolution_factor: u32,
    min_floor: f32,
) -> CollisionMesh {
    let mut mesh = CollisionMesh::default();
    let n = samples.samples_per_side();
    if n < 2 || samples.all_navigable() {
        return mesh;
    }
    let stride = resolution_factor.max(1) as usize;
    let spacing = samples.spacing();

    for z0 in (0..n - 1).step_by(stride) {
        let z1 = (z0 + stride).min(n - 1);
        for x0 in (0..n - 1).step_by(stride) {
            let x1 = (x0 + stride).min(n - 1);

            let mut blocked = false;
            let mut highest = f32::MIN;
            for z in z0..=z1 {
                for x in x0..=x1 {
                    blocked |= !samples.is_navigable(x, z);
                    highest = highest.max(samples.height(x, z));
                }
            }
            if !blocked {
                continue;
            }

            mesh.push_quad(
                x0 as f32 * spacing,
                x1 as f32 * spacing,
                z0 as f32 * spacing,
                z1 as f32 * spacing,
                highest.max(min_floor),
            );
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> SampleGrid {
        SampleGrid::new(n, 1.0)
    }

    #[test]
    fn test_all_navigable_emits_nothing() {
        let mesh = build_collision_mesh(&grid(17), 4, 0.5);
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn test_interior_sample_marks_one_cell() {
        let mut samples = grid(17);
        samples.set(6, 6, 0.0, false);
        let mesh = build_collision_mesh(&samples, 4, 0.5);
        assert_eq!(mesh.cell_count(), 1);
        assert_eq!(mesh.vertices[0], Vec3::new(4.0, 0.5, 4.0));
        assert_eq!(mesh.vertices[3], Vec3::new(8.0, 0.5, 8.0));
    }

    #[test]
    fn test_boundary_sample_marks_every_touching_cell() {
        let mut samples = grid(17);
        samples.set(4, 4, 0.0, false);
        let mesh = build_collision_mesh(&samples, 4, 0.5);
        assert_eq!(mesh.cell_count(), 4);
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn test_top_is_highest_sample_or_floor() {
        let mut samples = grid(9);
        samples.set(1, 1, 3.0, false);
        samples.set(2, 1, 7.5, true);
        let mesh = build_collision_mesh(&samples, 4, 0.5);
        assert_eq!(mesh.cell_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.y == 7.5));

        let mut low = grid(9);
        low.set(1, 1, 0.1, false);
        let mesh = build_collision_mesh(&low, 4, 0.5);
        assert!(mesh.vertices.iter().all(|v| v.y == 0.5));
    }

    #[test]
    fn test_uneven_stride_clamps_last_cell() {
        let mut samples = grid(17);
        samples.set(16, 16, 0.0, false);
        let mesh = build_collision_mesh(&samples, 5, 0.0);
        // Cells start at 0, 5, 10, 15; the last spans samples 15..=16.
        assert_eq!(mesh.cell_count(), 1);
        assert_eq!(mesh.vertices[0], Vec3::new(15.0, 0.0, 15.0));
        assert_eq!(mesh.vertices[3], Vec3::new(16.0, 0.0, 16.0));
    }

    #[test]
    fn test_quads_face_up() {
        let mut samples = grid(5);
        samples.set(0, 0, 0.0, false);
        let mesh = build_collision_mesh(&samples, 4, 1.0);
        for [a, b, c] in &mesh.indices {
            let (a, b, c) = (
                mesh.vertices[*a as usize],
                mesh.vertices[*b as usize],
                mesh.vertices[*c as usize],
            );
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }
}
