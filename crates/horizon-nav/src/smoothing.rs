//! Greedy line-of-sight path smoothing.

use glam::{Vec2, Vec3};
use horizon_core::{GridCoord, ObstructionProbe};

use crate::grid::NavigationGrid;

/// Samples per cell along a swept segment.
const SWEEP_SAMPLES_PER_CELL: f32 = 4.0;

/// Returns `true` if an agent of `radius` can move straight from `from` to `to`.
///
/// Every grid cell touched by a disc of `radius` swept along the segment must
/// be navigable, and `probe` must report no obstruction for the same sweep.
pub fn has_line_of_sight(
    grid: &NavigationGrid,
    probe: &dyn ObstructionProbe,
    from: Vec3,
    to: Vec3,
    radius: f32,
) -> bool {
    grid_sweep_clear(grid, from, to, radius) && !probe.is_sweep_obstructed(from, to, radius)
}

fn grid_sweep_clear(grid: &NavigationGrid, from: Vec3, to: Vec3, radius: f32) -> bool {
    let cell = grid.cell_size();
    let a = Vec2::new(from.x, from.z);
    let b = Vec2::new(to.x, to.z);
    let steps = ((a.distance(b) / cell) * SWEEP_SAMPLES_PER_CELL).ceil().max(1.0) as usize;

    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32);
        if !disc_clear(grid, p, radius) {
            return false;
        }
    }
    true
}

/// Cell `i` covers `[(i - 0.5) × cell, (i + 0.5) × cell)` on each axis.
fn disc_clear(grid: &NavigationGrid, p: Vec2, radius: f32) -> bool {
    let cell = grid.cell_size();
    let half = cell * 0.5;
    let x0 = ((p.x - radius) / cell + 0.5).floor() as i32;
    let x1 = ((p.x + radius) / cell + 0.5).floor() as i32;
    let z0 = ((p.y - radius) / cell + 0.5).floor() as i32;
    let z1 = ((p.y + radius) / cell + 0.5).floor() as i32;

    for z in z0..=z1 {
        for x in x0..=x1 {
            let center = Vec2::new(x as f32 * cell, z as f32 * cell);
            let d = ((p - center).abs() - Vec2::splat(half)).max(Vec2::ZERO);
            if d.length_squared() > radius * radius {
                continue;
            }
            if !grid.is_walkable(GridCoord::new(x, z)) {
                return false;
            }
        }
    }
    true
}

/// Drops intermediate waypoints that the agent can skip.
///
/// Walks forward keeping an anchor (the last retained waypoint); waypoint `i`
/// is dropped when the anchor can see waypoint `i + 1`. The first and last
/// waypoints are always kept.
pub fn smooth_path(
    grid: &NavigationGrid,
    probe: &dyn ObstructionProbe,
    raw: &[Vec3],
    radius: f32,
) -> Vec<Vec3> {
    if raw.len() <= 2 {
        return raw.to_vec();
    }

    let mut smoothed = vec![raw[0]];
    let mut anchor = raw[0];
    for i in 1..raw.len() - 1 {
        if !has_line_of_sight(grid, probe, anchor, raw[i + 1], radius) {
            smoothed.push(raw[i]);
            anchor = raw[i];
        }
    }
    smoothed.push(raw[raw.len() - 1]);
    smoothed
}
