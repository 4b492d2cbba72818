//! Navigation grid and pathfinding over the streamed world.
//!
//! A [`NavigationGrid`] samples the terrain oracle once over the full world
//! extent at a coarse cell size. The [`Pathfinder`] answers path queries on
//! it with A* or Dijkstra over the 8-connected cell graph, optionally
//! smooths the result with line-of-sight sweeps, and caches paths per
//! `(start cell, goal cell)` pair.

mod error;
mod grid;
mod node;
mod path;
mod pathfinder;
mod search;
mod smoothing;

pub use error::{NavigationError, PathFailure};
pub use grid::{NavSettings, NavigationGrid};
pub use node::NavigationNode;
pub use path::Path;
pub use pathfinder::Pathfinder;
pub use smoothing::{has_line_of_sight, smooth_path};
