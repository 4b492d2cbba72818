//! Obstruction queries answered with rapier ray casts.

use glam::Vec3;
use horizon_core::ObstructionProbe;

use crate::PhysicsWorld;

/// Start clearance rays slightly above the surface so the ground itself does not count.
const SURFACE_OFFSET: f32 = 0.05;

/// Heights above the start point at which sweep rays are cast.
const SWEEP_HEIGHTS: [f32; 3] = [0.25, 1.0, 1.75];

/// Lateral ray offsets as fractions of the agent radius.
const SWEEP_LANES: [f32; 3] = [-1.0, 0.0, 1.0];

/// [`ObstructionProbe`] over the colliders of a [`PhysicsWorld`].
///
/// The clearance test is a single upward ray. The cylinder sweep is
/// approximated by a fan of parallel rays: one lane on each side of the
/// agent plus the centre line, each cast at several heights.
#[derive(Clone, Copy)]
pub struct PhysicsProbe<'a> {
    physics: &'a PhysicsWorld,
}

impl<'a> PhysicsProbe<'a> {
    pub fn new(physics: &'a PhysicsWorld) -> Self {
        Self { physics }
    }
}

impl ObstructionProbe for PhysicsProbe<'_> {
    fn is_obstructed_above(&self, point: Vec3, clearance: f32) -> bool {
        if clearance <= 0.0 {
            return false;
        }
        let origin = point + Vec3::Y * SURFACE_OFFSET;
        self.physics.cast_ray(origin, Vec3::Y, clearance).is_some()
    }

    fn is_sweep_obstructed(&self, from: Vec3, to: Vec3, radius: f32) -> bool {
        let delta = to - from;
        let length = delta.length();
        let Some(dir) = delta.try_normalize() else {
            return false;
        };
        let side = Vec3::new(-dir.z, 0.0, dir.x)
            .try_normalize()
            .unwrap_or(Vec3::X);

        SWEEP_HEIGHTS.iter().any(|&h| {
            SWEEP_LANES.iter().any(|&lane| {
                let origin = from + Vec3::Y * h + side * (lane * radius);
                self.physics.cast_ray(origin, dir, length).is_some()
            })
        })
    }
}
