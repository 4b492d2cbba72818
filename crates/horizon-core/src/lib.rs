//! Shared vocabulary for the Horizon world runtime: chunk and grid coordinates,
//! per-chunk sample grids, object pools, world events, and the obstruction
//! probe interface consumed by navigation and implemented by physics.

mod coords;
mod events;
mod pool;
mod probe;
mod samples;

pub use coords::{ChunkCoord, GridCoord, NEIGHBOR_OFFSETS};
pub use events::{EventBus, WorldEvent};
pub use pool::{Acquired, Overflow, Pool};
pub use probe::{ObstructionProbe, OpenSky};
pub use samples::SampleGrid;
