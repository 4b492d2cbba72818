//! Level-of-detail decimation of the sample grid.

/// Sample stride for an LOD level: 1 at LOD 0, `2 × (lod + 1)` otherwise.
pub fn lod_stride(lod: u32) -> usize {
    if lod == 0 { 1 } else { 2 * (lod as usize + 1) }
}

/// Indices of the samples kept along one axis at `stride`.
///
/// The last sample is always kept so adjacent chunks share their edge.
pub fn kept_samples(samples_per_side: usize, stride: usize) -> Vec<usize> {
    if samples_per_side == 0 {
        return Vec::new();
    }
    let last = samples_per_side - 1;
    let mut kept: Vec<usize> = (0..samples_per_side).step_by(stride.max(1)).collect();
    if kept.last() != Some(&last) {
        kept.push(last);
    }
    kept
}
