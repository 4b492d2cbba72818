//! A* and Dijkstra over the 8-connected navigation grid.
//!
//! Moving into a cell costs the step length (1 cardinal, √2 diagonal)
//! multiplied by the destination cell's traversal cost. Both searches use a
//! binary heap with lazy deletion: stale heap entries are skipped when popped.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use horizon_core::NEIGHBOR_OFFSETS;

use crate::error::PathFailure;
use crate::grid::NavigationGrid;
use crate::node::Visit;

/// Result of a successful search.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SearchResult {
    /// Node indices from start to goal.
    pub nodes: Vec<usize>,
    /// Accumulated cost at the goal.
    pub cost: f32,
}

/// Heap entry ordered by `f`, then by lower `h`, then by index.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f32,
    h: f32,
    g: f32,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.h.total_cmp(&other.h))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Best-first search with the Euclidean heuristic.
///
/// Fails with [`PathFailure::SearchBoundExceeded`] once more than
/// `max_open_set` nodes are open at the same time.
pub(crate) fn a_star(
    grid: &mut NavigationGrid,
    start: usize,
    goal: usize,
    max_open_set: usize,
) -> Result<SearchResult, PathFailure> {
    run(grid, start, goal, Some(max_open_set), true)
}

/// Uniform-cost search: always expands the node with the lowest accumulated cost.
///
/// Unbounded except by the number of navigable nodes.
pub(crate) fn dijkstra(
    grid: &mut NavigationGrid,
    start: usize,
    goal: usize,
) -> Result<SearchResult, PathFailure> {
    run(grid, start, goal, None, false)
}

fn run(
    grid: &mut NavigationGrid,
    start: usize,
    goal: usize,
    max_open_set: Option<usize>,
    use_heuristic: bool,
) -> Result<SearchResult, PathFailure> {
    grid.reset_search_state();
    let width = grid.width();
    let length = grid.length();
    let goal_coord = grid.nodes()[goal].coord;

    let heuristic = |coord: horizon_core::GridCoord| {
        if use_heuristic {
            coord.distance(goal_coord)
        } else {
            0.0
        }
    };

    let nodes = grid.nodes_mut();
    let mut open = BinaryHeap::new();
    let mut open_count = 0usize;

    let h0 = heuristic(nodes[start].coord);
    nodes[start].g = 0.0;
    nodes[start].h = h0;
    nodes[start].visit = Visit::Open;
    open.push(Reverse(OpenEntry {
        f: h0,
        h: h0,
        g: 0.0,
        index: start,
    }));
    open_count += 1;

    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.index;
        if nodes[current].visit == Visit::Closed || entry.g > nodes[current].g {
            continue;
        }
        nodes[current].visit = Visit::Closed;
        open_count -= 1;

        if current == goal {
            return Ok(SearchResult {
                nodes: reconstruct(nodes, goal),
                cost: nodes[goal].g,
            });
        }

        let coord = nodes[current].coord;
        let g_current = nodes[current].g;
        for (dx, dz) in NEIGHBOR_OFFSETS {
            let next = coord.offset(dx, dz);
            if !next.in_bounds(width, length) {
                continue;
            }
            let ni = next.z as usize * width + next.x as usize;
            let neighbor = &mut nodes[ni];
            if !neighbor.navigable || neighbor.visit == Visit::Closed {
                continue;
            }

            let step = if dx != 0 && dz != 0 { SQRT_2 } else { 1.0 };
            let g = g_current + step * neighbor.cost;
            if g >= neighbor.g {
                continue;
            }

            if neighbor.visit == Visit::Unvisited {
                neighbor.h = heuristic(next);
                neighbor.visit = Visit::Open;
                open_count += 1;
            }
            neighbor.g = g;
            neighbor.parent = Some(current);
            open.push(Reverse(OpenEntry {
                f: g + neighbor.h,
                h: neighbor.h,
                g,
                index: ni,
            }));

            if let Some(max) = max_open_set
                && open_count > max
            {
                return Err(PathFailure::SearchBoundExceeded);
            }
        }
    }

    Err(PathFailure::Unreachable)
}

fn reconstruct(nodes: &[crate::node::NavigationNode], goal: usize) -> Vec<usize> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(parent) = nodes[current].parent {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
