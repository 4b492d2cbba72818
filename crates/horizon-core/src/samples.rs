//! Dense per-chunk terrain samples: height and navigability on a square grid.

use glam::Vec3;

/// Square grid of height and navigability samples covering one chunk.
///
/// A chunk of size `S` is sampled with `S / spacing + 1` samples per side so
/// neighbouring chunks share their edge samples. Storage is row-major with
/// `z` as the row index.
#[derive(Clone, Debug, Default)]
pub struct SampleGrid {
    samples_per_side: usize,
    spacing: f32,
    heights: Vec<f32>,
    navigable: Vec<bool>,
}

impl SampleGrid {
    /// Creates a flat, fully-navigable grid.
    pub fn new(samples_per_side: usize, spacing: f32) -> Self {
        let count = samples_per_side * samples_per_side;
        Self {
            samples_per_side,
            spacing,
            heights: vec![0.0; count],
            navigable: vec![true; count],
        }
    }

    /// Number of samples along each side.
    pub fn samples_per_side(&self) -> usize {
        self.samples_per_side
    }

    /// World distance between adjacent samples.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// World extent covered by the grid along one axis.
    pub fn extent(&self) -> f32 {
        self.samples_per_side.saturating_sub(1) as f32 * self.spacing
    }

    /// Row-major index of sample `(x, z)`.
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        z * self.samples_per_side + x
    }

    /// Height at sample `(x, z)`.
    #[inline]
    pub fn height(&self, x: usize, z: usize) -> f32 {
        self.heights[self.index(x, z)]
    }

    /// Navigability at sample `(x, z)`.
    #[inline]
    pub fn is_navigable(&self, x: usize, z: usize) -> bool {
        self.navigable[self.index(x, z)]
    }

    /// Overwrites a single sample.
    pub fn set(&mut self, x: usize, z: usize, height: f32, navigable: bool) {
        let i = self.index(x, z);
        self.heights[i] = height;
        self.navigable[i] = navigable;
    }

    /// All height samples, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// All navigability samples, row-major.
    pub fn navigability(&self) -> &[bool] {
        &self.navigable
    }

    /// Returns `true` if every sample is navigable.
    pub fn all_navigable(&self) -> bool {
        self.navigable.iter().all(|&n| n)
    }

    /// Resamples the whole grid from `sampler`, reusing the existing buffers.
    ///
    /// `sampler` receives world X/Z positions starting at `origin` and returns
    /// `(height, navigable)` for each sample.
    pub fn fill_from(
        &mut self,
        samples_per_side: usize,
        spacing: f32,
        origin: Vec3,
        mut sampler: impl FnMut(f32, f32) -> (f32, bool),
    ) {
        let count = samples_per_side * samples_per_side;
        self.samples_per_side = samples_per_side;
        self.spacing = spacing;
        self.heights.clear();
        self.navigable.clear();
        self.heights.reserve(count);
        self.navigable.reserve(count);

        for z in 0..samples_per_side {
            for x in 0..samples_per_side {
                let wx = origin.x + x as f32 * spacing;
                let wz = origin.z + z as f32 * spacing;
                let (h, nav) = sampler(wx, wz);
                self.heights.push(h);
                self.navigable.push(nav);
            }
        }
    }

    /// Bilinearly interpolated height at a chunk-local position.
    ///
    /// Positions outside the grid are clamped to its edge.
    pub fn height_bilinear(&self, local_x: f32, local_z: f32) -> f32 {
        if self.samples_per_side == 0 {
            return 0.0;
        }
        let max = (self.samples_per_side - 1) as f32;
        let gx = (local_x / self.spacing).clamp(0.0, max);
        let gz = (local_z / self.spacing).clamp(0.0, max);

        let x0 = gx.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.samples_per_side - 1);
        let z1 = (z0 + 1).min(self.samples_per_side - 1);
        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;

        let h00 = self.height(x0, z0);
        let h10 = self.height(x1, z0);
        let h01 = self.height(x0, z1);
        let h11 = self.height(x1, z1);

        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        near + (far - near) * tz
    }

    /// Navigability of the sample nearest to a chunk-local position.
    pub fn navigable_nearest(&self, local_x: f32, local_z: f32) -> bool {
        if self.samples_per_side == 0 {
            return false;
        }
        let max = (self.samples_per_side - 1) as f32;
        let x = (local_x / self.spacing).round().clamp(0.0, max) as usize;
        let z = (local_z / self.spacing).round().clamp(0.0, max) as usize;
        self.is_navigable(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_flat_and_navigable() {
        let grid = SampleGrid::new(17, 1.0);
        assert_eq!(grid.heights().len(), 17 * 17);
        assert!(grid.all_navigable());
        assert_eq!(grid.extent(), 16.0);
    }

    #[test]
    fn test_fill_from_samples_world_positions() {
        let mut grid = SampleGrid::default();
        grid.fill_from(3, 2.0, Vec3::new(10.0, 0.0, 20.0), |x, z| (x + z, x < 12.0));
        assert_eq!(grid.height(0, 0), 30.0);
        assert_eq!(grid.height(2, 1), 14.0 + 22.0);
        assert!(grid.is_navigable(0, 2));
        assert!(!grid.is_navigable(1, 0));
    }

    #[test]
    fn test_fill_from_reuses_allocation() {
        let mut grid = SampleGrid::new(17, 1.0);
        let cap = grid.heights.capacity();
        grid.fill_from(17, 1.0, Vec3::ZERO, |_, _| (1.0, true));
        assert_eq!(grid.heights.capacity(), cap);
    }

    #[test]
    fn test_bilinear_interpolates_between_samples() {
        let mut grid = SampleGrid::new(2, 1.0);
        grid.set(0, 0, 0.0, true);
        grid.set(1, 0, 2.0, true);
        grid.set(0, 1, 0.0, true);
        grid.set(1, 1, 2.0, true);
        assert!((grid.height_bilinear(0.5, 0.5) - 1.0).abs() < 1e-6);
        // Clamped outside the grid.
        assert!((grid.height_bilinear(5.0, 0.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_navigable_nearest_rounds() {
        let mut grid = SampleGrid::new(3, 1.0);
        grid.set(1, 1, 0.0, false);
        assert!(!grid.navigable_nearest(0.8, 1.2));
        assert!(grid.navigable_nearest(0.2, 0.2));
    }
}
