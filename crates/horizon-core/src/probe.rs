//! Geometric obstruction queries used by navigation (clearance tests and
//! line-of-sight sweeps). Physics provides the real implementation.

use glam::Vec3;

/// Answers "is there something solid here?" questions against world geometry.
pub trait ObstructionProbe {
    /// Returns `true` if anything solid lies within `clearance` directly above `point`.
    fn is_obstructed_above(&self, point: Vec3, clearance: f32) -> bool;

    /// Returns `true` if a cylinder of `radius` swept from `from` to `to` hits anything.
    fn is_sweep_obstructed(&self, from: Vec3, to: Vec3, radius: f32) -> bool;
}

/// A probe for worlds without physical geometry: nothing is ever obstructed.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSky;

impl ObstructionProbe for OpenSky {
    fn is_obstructed_above(&self, _point: Vec3, _clearance: f32) -> bool {
        false
    }

    fn is_sweep_obstructed(&self, _from: Vec3, _to: Vec3, _radius: f32) -> bool {
        false
    }
}

impl<P: ObstructionProbe + ?Sized> ObstructionProbe for &P {
    fn is_obstructed_above(&self, point: Vec3, clearance: f32) -> bool {
        (**self).is_obstructed_above(point, clearance)
    }

    fn is_sweep_obstructed(&self, from: Vec3, to: Vec3, radius: f32) -> bool {
        (**self).is_sweep_obstructed(from, to, radius)
    }
}
