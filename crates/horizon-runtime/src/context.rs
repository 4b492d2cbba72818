//! The world context: subsystem ownership, readiness and per-tick driving.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use glam::Vec3;
use horizon_config::Config;
use horizon_core::{EventBus, ObstructionProbe, OpenSky, WorldEvent};
use horizon_nav::{Path, PathFailure, Pathfinder};
use horizon_physics::{CollisionGeometryCache, PhysicsProbe, PhysicsWorld};
use horizon_streaming::{ChunkStreamer, StreamingDelta};
use horizon_terrain::{BiomeCostTable, TerrainOracle};

use crate::error::RuntimeError;

/// Optional subsystems, chosen once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Build the navigation grid and answer path queries.
    pub navigation: bool,
    /// Maintain collision geometry around the observer.
    pub collision: bool,
}

impl Capabilities {
    /// Every subsystem enabled.
    pub const ALL: Self = Self {
        navigation: true,
        collision: true,
    };

    /// Streaming only.
    pub const STREAMING_ONLY: Self = Self {
        navigation: false,
        collision: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// Where the context is in its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Waiting for the terrain producer to finish; ticks do nothing.
    AwaitingTerrain,
    /// Terrain is available and every enabled subsystem is running.
    Ready,
    /// Torn down; ticks and queries do nothing.
    Disposed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingTerrain => write!(f, "awaiting terrain"),
            Self::Ready => write!(f, "ready"),
            Self::Disposed => write!(f, "disposed"),
        }
    }
}

/// Builds an optional subsystem; a failure is logged once and leaves it absent.
fn optional<T, E: Into<RuntimeError>>(
    enabled: bool,
    name: &str,
    build: impl FnOnce() -> Result<T, E>,
) -> Option<T> {
    if !enabled {
        return None;
    }
    match build() {
        Ok(subsystem) => Some(subsystem),
        Err(e) => {
            tracing::error!("{} unavailable: {}", name, e.into());
            None
        }
    }
}

/// Owns every world subsystem and drives them from the observer position.
///
/// Construct one per world; there is no global instance. All operations run
/// to completion on the calling thread.
pub struct WorldContext {
    config: Config,
    capabilities: Capabilities,
    terrain: Arc<dyn TerrainOracle>,
    events: EventBus,
    lifecycle: Lifecycle,
    ready_signal: Option<Receiver<()>>,
    streamer: ChunkStreamer,
    pathfinder: Option<Pathfinder>,
    collision: Option<CollisionGeometryCache>,
    physics: PhysicsWorld,
    observer: Option<Vec3>,
}

impl WorldContext {
    /// Creates a context with the default biome costs.
    pub fn new(
        config: Config,
        terrain: Arc<dyn TerrainOracle>,
        capabilities: Capabilities,
    ) -> Result<Self, RuntimeError> {
        Self::with_costs(config, terrain, capabilities, BiomeCostTable::default())
    }

    /// Creates a context.
    ///
    /// An invalid configuration fails the whole context. If the terrain
    /// already reports itself generated the context starts [`Lifecycle::Ready`].
    pub fn with_costs(
        config: Config,
        terrain: Arc<dyn TerrainOracle>,
        capabilities: Capabilities,
        costs: BiomeCostTable,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;

        let events = EventBus::new();
        let mut physics = PhysicsWorld::new();
        let streamer = ChunkStreamer::new(&config, Arc::clone(&terrain), events.clone())?;
        let pathfinder = optional(capabilities.navigation, "Navigation", || {
            Pathfinder::new(&config, costs, events.clone())
        });
        let collision = optional(capabilities.collision, "Collision geometry", || {
            CollisionGeometryCache::new(&config, &mut physics, events.clone())
        });

        let mut ctx = Self {
            config,
            capabilities,
            terrain,
            events,
            lifecycle: Lifecycle::AwaitingTerrain,
            ready_signal: None,
            streamer,
            pathfinder,
            collision,
            physics,
            observer: None,
        };
        if ctx.terrain.is_world_generated() {
            ctx.become_ready();
        } else {
            tracing::info!("World context waiting for terrain");
        }
        Ok(ctx)
    }

    /// Hands over the terrain producer's completion signal.
    ///
    /// The context checks it once per tick and becomes ready when a message
    /// arrives (or the producer hangs up and the terrain reports generated).
    pub fn with_ready_signal(mut self, signal: Receiver<()>) -> Self {
        if self.lifecycle == Lifecycle::AwaitingTerrain {
            self.ready_signal = Some(signal);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Checks for terrain readiness without blocking. Returns `true` if ready.
    pub fn poll_ready(&mut self) -> bool {
        if self.lifecycle != Lifecycle::AwaitingTerrain {
            return self.lifecycle == Lifecycle::Ready;
        }

        let signalled = match &self.ready_signal {
            Some(rx) => match rx.try_recv() {
                Ok(()) => true,
                Err(TryRecvError::Empty) => false,
                Err(TryRecvError::Disconnected) => self.terrain.is_world_generated(),
            },
            None => self.terrain.is_world_generated(),
        };
        if signalled {
            self.become_ready();
        }
        signalled
    }

    /// Blocks on the terrain producer's signal for at most `timeout`.
    ///
    /// Without a signal this is [`poll_ready`](Self::poll_ready).
    pub fn wait_ready(&mut self, timeout: Duration) -> bool {
        if self.lifecycle == Lifecycle::AwaitingTerrain
            && let Some(rx) = &self.ready_signal
        {
            let signalled = match rx.recv_timeout(timeout) {
                Ok(()) => true,
                Err(RecvTimeoutError::Timeout) => false,
                Err(RecvTimeoutError::Disconnected) => self.terrain.is_world_generated(),
            };
            if signalled {
                self.become_ready();
            }
            return signalled;
        }
        self.poll_ready()
    }

    fn become_ready(&mut self) {
        self.ready_signal = None;
        self.lifecycle = Lifecycle::Ready;
        self.generate_navigation();
        tracing::info!("World context ready");
    }

    fn generate_navigation(&mut self) {
        let Some(pathfinder) = self.pathfinder.as_mut() else {
            return;
        };
        let physics_probe = PhysicsProbe::new(&self.physics);
        let probe: &dyn ObstructionProbe = if self.collision.is_some() {
            &physics_probe
        } else {
            &OpenSky
        };
        pathfinder.generate(self.terrain.as_ref(), probe);
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    // -----------------------------------------------------------------------
    // Per-tick driving
    // -----------------------------------------------------------------------

    /// Advances the world for an observer at `observer`.
    ///
    /// Updates the chunk window, drops colliders of chunks that left it,
    /// culls distant colliders and builds colliders for active chunks in
    /// range. Returns the window change, if the observer crossed into a new
    /// chunk. Does nothing until the context is ready.
    pub fn tick(&mut self, observer: Vec3) -> Option<StreamingDelta> {
        if !self.poll_ready() {
            return None;
        }
        self.observer = Some(observer);
        let delta = self.streamer.update_observer_position(observer);

        if let Some(cache) = self.collision.as_mut() {
            if let Some(delta) = &delta {
                for &coord in &delta.deactivated {
                    cache.on_chunk_deactivated(coord, &mut self.physics);
                }
            }
            cache.update(observer, &mut self.physics);
            for chunk in self.streamer.active_chunks() {
                if cache.in_range(chunk.coord(), observer) {
                    cache.ensure_collider(chunk.coord(), chunk.samples(), &mut self.physics);
                }
            }
            self.physics.step();
        }

        if let Some(delta) = &delta {
            tracing::trace!(
                "Tick at {}: +{} -{} ~{}",
                observer,
                delta.activated.len(),
                delta.deactivated.len(),
                delta.remeshed.len()
            );
        }
        delta
    }

    /// Finds a path between two world positions.
    ///
    /// Fails with [`PathFailure::GridNotGenerated`] while the context is not
    /// ready or navigation is unavailable.
    pub fn find_path(&mut self, start: Vec3, end: Vec3) -> Result<Path, PathFailure> {
        if self.lifecycle != Lifecycle::Ready {
            return Err(PathFailure::GridNotGenerated);
        }
        let Some(pathfinder) = self.pathfinder.as_mut() else {
            return Err(PathFailure::GridNotGenerated);
        };
        let physics_probe = PhysicsProbe::new(&self.physics);
        let probe: &dyn ObstructionProbe = if self.collision.is_some() {
            &physics_probe
        } else {
            &OpenSky
        };
        pathfinder.calculate_path(start, end, probe)
    }

    /// Registers an event listener.
    pub fn subscribe(&self) -> Receiver<WorldEvent> {
        self.events.subscribe()
    }

    /// Rebuilds every derived structure from the terrain.
    ///
    /// Active chunks are re-sampled, collision meshes and colliders are
    /// dropped (they come back on the next tick) and the navigation grid is
    /// regenerated, which clears the path cache.
    pub fn regenerate(&mut self) -> Result<(), RuntimeError> {
        match self.lifecycle {
            Lifecycle::Disposed => return Err(RuntimeError::Disposed),
            Lifecycle::AwaitingTerrain => return Ok(()),
            Lifecycle::Ready => {}
        }
        self.streamer.regenerate();
        if let Some(cache) = self.collision.as_mut() {
            cache.remove_all(&mut self.physics);
            cache.clear_cache();
            self.physics.step();
        }
        self.generate_navigation();
        tracing::info!("World regenerated");
        Ok(())
    }

    /// Tears the world down: every chunk goes back to the pool, every
    /// collider leaves the physics world. Idempotent.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.streamer.deactivate_all();
        if let Some(cache) = self.collision.as_mut() {
            cache.dispose(&mut self.physics);
        }
        if let Some(pathfinder) = self.pathfinder.as_mut() {
            pathfinder.clear_cache();
        }
        self.ready_signal = None;
        self.observer = None;
        self.lifecycle = Lifecycle::Disposed;
        tracing::info!("World context disposed");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Terrain height at `pos`, from the active chunk if one covers it.
    pub fn height_at(&self, pos: Vec3) -> f32 {
        match self.streamer.chunk_at(pos) {
            Some(_) => self.streamer.height_at(pos),
            None => self.terrain.height_at(pos.x, pos.z),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn observer(&self) -> Option<Vec3> {
        self.observer
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    pub fn pathfinder(&self) -> Option<&Pathfinder> {
        self.pathfinder.as_ref()
    }

    pub fn collision(&self) -> Option<&CollisionGeometryCache> {
        self.collision.as_ref()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}
