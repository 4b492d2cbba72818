//! Chunk streaming around a single observer.
//!
//! The [`ChunkStreamer`] keeps exactly the chunks inside a square window
//! around the observer's chunk active. Chunk instances are never dropped:
//! they cycle between a free pool, the active map and a bounded inactive
//! cache, so steady-state streaming performs no allocation.

mod chunk;
mod error;
mod streamer;

pub use chunk::{Chunk, ChunkState};
pub use error::StreamingError;
pub use streamer::{ChunkStreamer, StreamingDelta, mesh_params};
