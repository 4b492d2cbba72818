//! World event fan-out.
//!
//! Producers (streamer, collision cache, pathfinder) publish [`WorldEvent`]s
//! into an [`EventBus`]; any number of listeners hold a channel receiver
//! obtained from [`EventBus::subscribe`]. Publishing never blocks, and
//! listeners that dropped their receiver are pruned on the next publish.

use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec3;

use crate::coords::ChunkCoord;

/// Fire-and-forget notifications emitted by the world runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    /// A chunk entered the active window.
    ChunkActivated(ChunkCoord),
    /// A chunk left the active window.
    ChunkDeactivated(ChunkCoord),
    /// A collider was configured for a chunk.
    ColliderGenerated(ChunkCoord),
    /// A chunk's collider was culled or removed.
    ColliderRemoved(ChunkCoord),
    /// A path query finished; empty when no path was found.
    PathCalculated(Vec<Vec3>),
}

/// Observer registry that broadcasts [`WorldEvent`]s over channels.
///
/// Cloning the bus shares the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<WorldEvent>>>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener and returns its receiving end.
    pub fn subscribe(&self) -> Receiver<WorldEvent> {
        let (tx, rx) = unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Delivers `event` to every live listener.
    pub fn publish(&self, event: WorldEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of registered listeners (including ones not yet pruned).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
