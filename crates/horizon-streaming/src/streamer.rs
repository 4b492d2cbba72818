//! Windowed chunk lifecycle: pool → active → inactive → pool.

use std::sync::Arc;

use glam::Vec3;
use horizon_config::Config;
use horizon_core::{Acquired, ChunkCoord, EventBus, Overflow, Pool, WorldEvent};
use horizon_mesh::{MeshBuildParams, MeshBuilder};
use horizon_terrain::TerrainOracle;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::chunk::{Chunk, ChunkState};
use crate::error::StreamingError;

/// Changes produced by one window update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingDelta {
    /// Coordinates that became active, in ascending order.
    pub activated: Vec<ChunkCoord>,
    /// Coordinates that left the active window, in ascending order.
    pub deactivated: Vec<ChunkCoord>,
    /// Retained chunks whose LOD changed and were remeshed.
    pub remeshed: Vec<ChunkCoord>,
}

impl StreamingDelta {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty() && self.deactivated.is_empty() && self.remeshed.is_empty()
    }
}

/// Mesh builder parameters derived from the world and mesh settings.
pub fn mesh_params(config: &Config) -> MeshBuildParams {
    MeshBuildParams {
        height_scale: config.world.height_scale,
        navigable_threshold: config.world.navigable_height_threshold,
        parallel: config.mesh.parallel,
        min_parallel_vertices: config.mesh.min_parallel_vertices,
        ..Default::default()
    }
}

/// Keeps the chunks around the observer active.
///
/// Every chunk instance is, at any time, in exactly one of: the free pool,
/// the active map, or the inactive cache.
pub struct ChunkStreamer {
    chunk_size: u32,
    world_chunks_x: u32,
    world_chunks_z: u32,
    render_distance: u32,
    max_inactive: usize,
    terrain: Arc<dyn TerrainOracle>,
    mesher: MeshBuilder,
    pool: Pool<Chunk>,
    active: FxHashMap<ChunkCoord, Chunk>,
    inactive: FxHashMap<ChunkCoord, Chunk>,
    observer: Option<ChunkCoord>,
    next_id: u64,
    events: EventBus,
}

impl ChunkStreamer {
    /// Creates a streamer and fills its pool with `initial_pool_size` chunks.
    pub fn new(
        config: &Config,
        terrain: Arc<dyn TerrainOracle>,
        events: EventBus,
    ) -> Result<Self, StreamingError> {
        config.validate()?;

        let pool_size = config.streaming.initial_pool_size;
        let pool = Pool::prefilled(pool_size, Overflow::Grow, |i| Chunk::new(i as u64));
        tracing::info!(
            "Chunk streamer ready: {}x{} chunks of {}, render distance {}, pool {}",
            config.world.world_chunks_x,
            config.world.world_chunks_z,
            config.world.chunk_size,
            config.streaming.render_distance,
            pool_size
        );

        Ok(Self {
            chunk_size: config.world.chunk_size,
            world_chunks_x: config.world.world_chunks_x,
            world_chunks_z: config.world.world_chunks_z,
            render_distance: config.streaming.render_distance,
            max_inactive: config.streaming.max_inactive_chunks,
            terrain,
            mesher: MeshBuilder::new(mesh_params(config)),
            pool,
            active: FxHashMap::default(),
            inactive: FxHashMap::default(),
            observer: None,
            next_id: pool_size as u64,
            events,
        })
    }

    /// Converts `pos` to a chunk coordinate and updates the window if it changed.
    ///
    /// Returns `None` when the observer is still in the same chunk.
    pub fn update_observer_position(&mut self, pos: Vec3) -> Option<StreamingDelta> {
        let current = ChunkCoord::from_world(pos, self.chunk_size as f32);
        if self.observer == Some(current) {
            return None;
        }
        Some(self.update_around_observer(current))
    }

    /// Makes the active set exactly the window around `current`, clipped to the world.
    pub fn update_around_observer(&mut self, current: ChunkCoord) -> StreamingDelta {
        self.observer = Some(current);
        let desired = self.desired_window(current);
        let mut delta = StreamingDelta::default();

        let mut leaving: Vec<ChunkCoord> = self
            .active
            .keys()
            .copied()
            .filter(|c| !desired.contains(c))
            .collect();
        leaving.sort_unstable();
        for coord in leaving {
            self.deactivate(coord);
            delta.deactivated.push(coord);
        }

        for (coord, chunk) in self.active.iter_mut() {
            let lod = lod_for(*coord, current);
            if chunk.lod() != lod {
                chunk.set_lod(lod);
                let (samples, lod, mesh) = chunk.mesh_parts();
                self.mesher.build(samples, lod, mesh);
                delta.remeshed.push(*coord);
            }
        }
        delta.remeshed.sort_unstable();

        let mut entering: Vec<ChunkCoord> = desired
            .into_iter()
            .filter(|c| !self.active.contains_key(c))
            .collect();
        entering.sort_unstable();
        for coord in entering {
            self.activate(coord, current);
            delta.activated.push(coord);
        }

        tracing::debug!(
            "Observer at chunk {}: +{} -{} ~{} (active {}, inactive {}, pooled {})",
            current,
            delta.activated.len(),
            delta.deactivated.len(),
            delta.remeshed.len(),
            self.active.len(),
            self.inactive.len(),
            self.pool.len()
        );
        delta
    }

    fn desired_window(&self, center: ChunkCoord) -> FxHashSet<ChunkCoord> {
        let xs = window_span(center.x, self.render_distance, self.world_chunks_x);
        let zs = window_span(center.z, self.render_distance, self.world_chunks_z);
        let mut desired = FxHashSet::default();
        for z in zs {
            for x in xs.clone() {
                desired.insert(ChunkCoord::new(x, z));
            }
        }
        desired
    }

    fn activate(&mut self, coord: ChunkCoord, observer: ChunkCoord) {
        let lod = lod_for(coord, observer);

        let mut chunk = if let Some(chunk) = self.inactive.remove(&coord) {
            tracing::trace!("Reactivating cached chunk {}", coord);
            chunk
        } else {
            let id = self.next_id;
            let (mut chunk, how) = self.pool.acquire_or_else(|| Chunk::new(id));
            if how == Acquired::Allocated {
                self.next_id += 1;
                tracing::warn!(
                    "Chunk pool exhausted; allocated chunk #{} for {} ({} overflow allocations)",
                    id,
                    coord,
                    self.pool.overflow_allocations()
                );
            }
            chunk.initialize(coord, self.chunk_size, self.terrain.as_ref());
            // Force a rebuild below.
            chunk.set_lod(u32::MAX);
            chunk
        };

        if chunk.lod() != lod || chunk.mesh().is_empty() {
            chunk.set_lod(lod);
            let (samples, lod, mesh) = chunk.mesh_parts();
            self.mesher.build(samples, lod, mesh);
        }
        chunk.set_state(ChunkState::Active);
        self.active.insert(coord, chunk);
        self.events.publish(WorldEvent::ChunkActivated(coord));
    }

    fn deactivate(&mut self, coord: ChunkCoord) {
        let Some(mut chunk) = self.active.remove(&coord) else {
            return;
        };
        if self.inactive.len() < self.max_inactive {
            chunk.set_state(ChunkState::Inactive);
            self.inactive.insert(coord, chunk);
        } else {
            self.recycle(chunk);
        }
        self.events.publish(WorldEvent::ChunkDeactivated(coord));
    }

    fn recycle(&mut self, mut chunk: Chunk) {
        chunk.reset();
        // A grow pool never refuses.
        let _ = self.pool.release(chunk);
    }

    /// Re-samples every active chunk and drops the inactive cache.
    ///
    /// Call after the terrain or world settings change.
    pub fn regenerate(&mut self) {
        let cached: Vec<Chunk> = self.inactive.drain().map(|(_, c)| c).collect();
        for chunk in cached {
            self.recycle(chunk);
        }
        for (coord, chunk) in self.active.iter_mut() {
            chunk.initialize(*coord, self.chunk_size, self.terrain.as_ref());
            let (samples, lod, mesh) = chunk.mesh_parts();
            self.mesher.build(samples, lod, mesh);
        }
        tracing::info!("Regenerated {} active chunks", self.active.len());
    }

    /// Returns every chunk to the pool. Returns the coordinates that were active.
    pub fn deactivate_all(&mut self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.active.keys().copied().collect();
        coords.sort_unstable();
        let chunks: Vec<Chunk> = self
            .active
            .drain()
            .chain(self.inactive.drain())
            .map(|(_, c)| c)
            .collect();
        for chunk in chunks {
            self.recycle(chunk);
        }
        for &coord in &coords {
            self.events.publish(WorldEvent::ChunkDeactivated(coord));
        }
        self.observer = None;
        coords
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The active chunk containing `pos`, if any.
    pub fn chunk_at(&self, pos: Vec3) -> Option<&Chunk> {
        self.active
            .get(&ChunkCoord::from_world(pos, self.chunk_size as f32))
    }

    /// Navigability at `pos`; `false` when no active chunk owns it.
    pub fn is_navigable(&self, pos: Vec3) -> bool {
        self.chunk_at(pos).is_some_and(|c| c.is_navigable(pos))
    }

    /// Interpolated height at `pos`; `0.0` when no active chunk owns it.
    pub fn height_at(&self, pos: Vec3) -> f32 {
        self.chunk_at(pos).map_or(0.0, |c| c.height_at(pos))
    }

    /// Active chunk at `coord`.
    pub fn active_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.active.get(&coord)
    }

    /// Iterates over the active chunks.
    pub fn active_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active.values()
    }

    /// Active coordinates in ascending order.
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.active.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Whether `coord` is in the inactive cache.
    pub fn is_cached(&self, coord: ChunkCoord) -> bool {
        self.inactive.contains_key(&coord)
    }

    /// Number of active chunks.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of cached inactive chunks.
    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    /// Number of chunks waiting in the pool.
    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    /// Chunks allocated because the pool was empty.
    pub fn overflow_allocations(&self) -> usize {
        self.pool.overflow_allocations()
    }

    /// All chunk instances owned by the streamer.
    pub fn total_instances(&self) -> usize {
        self.pool.len() + self.active.len() + self.inactive.len()
    }

    /// Instance ids per partition: `(pooled, active, inactive)`.
    pub fn partition_ids(&self) -> (Vec<u64>, Vec<u64>, Vec<u64>) {
        (
            self.pool.iter().map(Chunk::id).collect(),
            self.active.values().map(Chunk::id).collect(),
            self.inactive.values().map(Chunk::id).collect(),
        )
    }

    /// The observer's chunk as of the last update.
    pub fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.observer
    }

    /// Chunk edge length in world units.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// The shared terrain oracle.
    pub fn terrain(&self) -> &Arc<dyn TerrainOracle> {
        &self.terrain
    }
}

/// Chunk indices within `radius` of `center`, clipped to `[0, chunks)`.
///
/// Empty when the window misses the world.
fn window_span(center: i32, radius: u32, chunks: u32) -> std::ops::RangeInclusive<i32> {
    let last = i64::from(chunks).min(i64::from(i32::MAX) + 1) - 1;
    let lo = (i64::from(center) - i64::from(radius)).max(0);
    let hi = (i64::from(center) + i64::from(radius)).min(last);
    if lo > hi {
        return 1..=0;
    }
    lo as i32..=hi as i32
}

fn lod_for(coord: ChunkCoord, observer: ChunkCoord) -> u32 {
    coord.distance(observer).floor() as u32
}

#[cfg(test)]
#[path = "streamer_tests.rs"]
mod tests;
