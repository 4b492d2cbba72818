//! Integer coordinates for the two grids laid over the world: the chunk grid
//! used for streaming and collision, and the navigation grid used for
//! pathfinding.

use std::fmt;

use glam::Vec3;

/// Offsets of the 8-connected neighbourhood (cardinals first, then diagonals).
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Identifies a chunk cell in the 2D chunk grid.
///
/// The world origin of a chunk is `coordinate × chunk_size` on the X/Z plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate offset by `(dx, dz)` chunks.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// Returns the chunk containing the given world position.
    ///
    /// Uses floor division so negative positions map to negative chunks.
    pub fn from_world(pos: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_size).floor() as i32,
            z: (pos.z / chunk_size).floor() as i32,
        }
    }

    /// World-space origin (minimum corner) of this chunk.
    pub fn origin(self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// World-space centre of this chunk on the ground plane.
    pub fn center(self, chunk_size: f32) -> Vec3 {
        self.origin(chunk_size) + Vec3::new(chunk_size * 0.5, 0.0, chunk_size * 0.5)
    }

    /// Euclidean distance to another chunk, in chunk units.
    pub fn distance(self, other: Self) -> f32 {
        let dx = (i64::from(self.x) - i64::from(other.x)) as f32;
        let dz = (i64::from(self.z) - i64::from(other.z)) as f32;
        (dx * dx + dz * dz).sqrt()
    }

    /// Largest per-axis distance to another chunk (square-window radius).
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// Returns `true` if this coordinate lies inside `[0, chunks_x) × [0, chunks_z)`.
    pub fn within_bounds(self, chunks_x: u32, chunks_z: u32) -> bool {
        self.x >= 0 && self.z >= 0 && (self.x as u32) < chunks_x && (self.z as u32) < chunks_z
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Addresses one cell of the navigation grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub z: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate offset by `(dx, dz)` cells.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// Returns `true` if the cell lies inside a `width × length` grid.
    pub fn in_bounds(self, width: usize, length: usize) -> bool {
        self.x >= 0 && self.z >= 0 && (self.x as usize) < width && (self.z as usize) < length
    }

    /// Euclidean distance to another cell, in cell units.
    pub fn distance(self, other: Self) -> f32 {
        let dx = (i64::from(self.x) - i64::from(other.x)) as f32;
        let dz = (i64::from(self.z) - i64::from(other.z)) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
