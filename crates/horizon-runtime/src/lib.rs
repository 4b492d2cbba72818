//! Runtime wiring for a streamed world.
//!
//! A [`WorldContext`] owns the chunk streamer, the optional navigation and
//! collision subsystems, the physics world and the event bus. It is driven
//! cooperatively: callers invoke [`WorldContext::tick`] with the observer
//! position and issue path queries between ticks.

mod context;
mod error;

pub use context::{Capabilities, Lifecycle, WorldContext};
pub use error::RuntimeError;
