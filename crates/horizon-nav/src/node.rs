//! Navigation grid cells and their per-search scratch state.

use glam::Vec3;
use horizon_core::GridCoord;

/// Search bookkeeping for a node within one query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Visit {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// One cell of the navigation grid.
///
/// `g`, `h`, `parent` and the visit state are scratch space for the current
/// search and are reset before every query.
#[derive(Clone, Debug)]
pub struct NavigationNode {
    /// Grid coordinate.
    pub coord: GridCoord,
    /// World position of the cell centre, at terrain height.
    pub position: Vec3,
    /// Whether agents may enter the cell.
    pub navigable: bool,
    /// Traversal cost multiplier (≥ 1).
    pub cost: f32,
    pub(crate) g: f32,
    pub(crate) h: f32,
    pub(crate) parent: Option<usize>,
    pub(crate) visit: Visit,
}

impl NavigationNode {
    /// Creates a node with cleared search state.
    pub fn new(coord: GridCoord, position: Vec3, navigable: bool, cost: f32) -> Self {
        Self {
            coord,
            position,
            navigable,
            cost,
            g: f32::INFINITY,
            h: 0.0,
            parent: None,
            visit: Visit::Unvisited,
        }
    }

    /// Accumulated cost from the start in the last search.
    pub fn accumulated_cost(&self) -> f32 {
        self.g
    }

    /// Heuristic estimate to the goal in the last search.
    pub fn heuristic(&self) -> f32 {
        self.h
    }

    pub(crate) fn reset_search(&mut self) {
        self.g = f32::INFINITY;
        self.h = 0.0;
        self.parent = None;
        self.visit = Visit::Unvisited;
    }
}
