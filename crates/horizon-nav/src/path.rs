//! Search results as world-space waypoints.

use glam::Vec3;

/// A computed path: world-space waypoints from the start cell to the goal cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    /// Ordered waypoints; first is the start cell, last the goal cell.
    pub waypoints: Vec<Vec3>,
    /// Total traversal cost found by the search.
    pub cost: f32,
}

impl Path {
    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint.
    pub fn start(&self) -> Option<Vec3> {
        self.waypoints.first().copied()
    }

    /// Last waypoint.
    pub fn goal(&self) -> Option<Vec3> {
        self.waypoints.last().copied()
    }

    /// Sum of straight-line segment lengths.
    pub fn length(&self) -> f32 {
        self.waypoints.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}
