//! Pooled static colliders for streamed chunks.

use glam::{Vec2, Vec3};
use horizon_config::Config;
use horizon_core::{Acquired, ChunkCoord, EventBus, Overflow, Pool, SampleGrid, WorldEvent};
use rapier3d::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::collision_mesh::{CollisionMesh, build_collision_mesh};
use crate::error::CollisionError;
use crate::{PhysicsWorld, to_vector};

/// Radius of the shape parked on pooled, disabled colliders.
const PLACEHOLDER_RADIUS: f32 = 0.01;

/// Collision parameters resolved from [`Config`].
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionSettings {
    /// Chunk edge length in world units.
    pub chunk_size: f32,
    /// Sample stride of the collision mesh.
    pub resolution_factor: u32,
    /// Minimum height of solid cells.
    pub min_floor_height: f32,
    /// Maximum memoized meshes.
    pub cache_capacity: usize,
    /// Pre-allocated collider handles.
    pub pool_size: usize,
    /// Horizontal distance beyond which colliders are culled.
    pub cull_distance: f32,
    /// Convex hulls instead of triangle meshes.
    pub convex: bool,
}

impl CollisionSettings {
    pub fn from_config(config: &Config) -> Self {
        let c = &config.collision;
        Self {
            chunk_size: config.world.chunk_size_f32(),
            resolution_factor: c.resolution_factor,
            min_floor_height: c.min_floor_height,
            cache_capacity: c.cache_capacity,
            pool_size: c.pool_size,
            cull_distance: c.cull_distance,
            convex: c.convex,
        }
    }
}

fn placeholder_collider() -> Collider {
    ColliderBuilder::ball(PLACEHOLDER_RADIUS).enabled(false).build()
}

fn trimesh_shape(coord: ChunkCoord, mesh: &CollisionMesh) -> Option<SharedShape> {
    let vertices = mesh.vertices.iter().map(|&v| to_vector(v)).collect();
    match SharedShape::trimesh(vertices, mesh.indices.clone()) {
        Ok(shape) => Some(shape),
        Err(e) => {
            tracing::warn!("Rejected collision mesh for {}: {:?}", coord, e);
            None
        }
    }
}

/// Builds the rapier shape for a non-empty mesh.
fn build_shape(coord: ChunkCoord, mesh: &CollisionMesh, convex: bool) -> Option<SharedShape> {
    if mesh.is_empty() {
        return None;
    }
    if convex {
        let points: Vec<Vector> = mesh.vertices.iter().map(|&v| to_vector(v)).collect();
        if let Some(hull) = SharedShape::convex_hull(&points) {
            return Some(hull);
        }
        tracing::debug!("Degenerate hull for {}; using triangle mesh", coord);
    }
    trimesh_shape(coord, mesh)
}

/// Memoized collision meshes plus the live collider of each nearby chunk.
///
/// Collider handles come from a fixed-size pool of disabled placeholder
/// colliders. When the pool runs dry a new collider is inserted with a
/// warning; when it is full on release the collider is removed from the
/// world instead.
pub struct CollisionGeometryCache {
    settings: CollisionSettings,
    meshes: FxHashMap<ChunkCoord, CollisionMesh>,
    active: FxHashMap<ChunkCoord, ColliderHandle>,
    /// Chunks whose samples yield no usable shape; skipped until they leave
    /// the window or the cache is cleared.
    shapeless: FxHashSet<ChunkCoord>,
    mesh_builds: usize,
    pool: Pool<ColliderHandle>,
    events: EventBus,
}

impl CollisionGeometryCache {
    /// Validates the configuration and pre-fills the handle pool.
    pub fn new(
        config: &Config,
        physics: &mut PhysicsWorld,
        events: EventBus,
    ) -> Result<Self, CollisionError> {
        config.validate()?;
        Ok(Self::with_settings(
            CollisionSettings::from_config(config),
            physics,
            events,
        ))
    }

    pub fn with_settings(
        settings: CollisionSettings,
        physics: &mut PhysicsWorld,
        events: EventBus,
    ) -> Self {
        let pool = Pool::prefilled(settings.pool_size, Overflow::Discard, |_| {
            physics.collider_set.insert(placeholder_collider())
        });
        tracing::info!(
            "Collision cache ready: {} pooled colliders, mesh cache capacity {}",
            pool.len(),
            settings.cache_capacity
        );
        Self {
            settings,
            meshes: FxHashMap::default(),
            active: FxHashMap::default(),
            shapeless: FxHashSet::default(),
            mesh_builds: 0,
            pool,
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Collider lifecycle
    // -----------------------------------------------------------------------

    /// Ensures `coord` has a collider built from `samples`.
    ///
    /// Returns the live handle, or `None` when the chunk has no solid
    /// geometry. A chunk that already has a collider keeps it.
    pub fn ensure_collider(
        &mut self,
        coord: ChunkCoord,
        samples: &SampleGrid,
        physics: &mut PhysicsWorld,
    ) -> Option<ColliderHandle> {
        if let Some(&handle) = self.active.get(&coord) {
            return Some(handle);
        }
        if self.shapeless.contains(&coord) {
            return None;
        }

        let convex = self.settings.convex;
        let shape = match self.meshes.get(&coord) {
            Some(mesh) => build_shape(coord, mesh, convex),
            None => {
                let mesh = build_collision_mesh(
                    samples,
                    self.settings.resolution_factor,
                    self.settings.min_floor_height,
                );
                self.mesh_builds += 1;
                let shape = build_shape(coord, &mesh, convex);
                if self.meshes.len() < self.settings.cache_capacity {
                    self.meshes.insert(coord, mesh);
                }
                shape
            }
        };
        let Some(shape) = shape else {
            self.shapeless.insert(coord);
            return None;
        };

        let (mut handle, acquired) = self
            .pool
            .acquire_or_else(|| physics.collider_set.insert(placeholder_collider()));
        if acquired == Acquired::Allocated {
            tracing::warn!(
                "Collider pool exhausted at {}; allocated a new handle ({} so far)",
                coord,
                self.pool.overflow_allocations()
            );
        }

        let translation = to_vector(coord.origin(self.settings.chunk_size));
        match physics.collider_set.get_mut(handle) {
            Some(collider) => {
                collider.set_shape(shape);
                collider.set_translation(translation);
                collider.set_enabled(true);
            }
            None => {
                tracing::warn!("Pooled collider for {} no longer exists; replacing it", coord);
                handle = physics
                    .collider_set
                    .insert(ColliderBuilder::new(shape).translation(translation).build());
            }
        }

        self.active.insert(coord, handle);
        tracing::debug!("Collider generated for {}", coord);
        self.events.publish(WorldEvent::ColliderGenerated(coord));
        Some(handle)
    }

    /// Builds the collider of a chunk that just became active, if it is in range.
    pub fn on_chunk_activated(
        &mut self,
        coord: ChunkCoord,
        samples: &SampleGrid,
        observer: Vec3,
        physics: &mut PhysicsWorld,
    ) -> Option<ColliderHandle> {
        if !self.in_range(coord, observer) {
            return None;
        }
        self.ensure_collider(coord, samples, physics)
    }

    /// Drops the collider of a chunk that left the active window.
    pub fn on_chunk_deactivated(&mut self, coord: ChunkCoord, physics: &mut PhysicsWorld) -> bool {
        self.shapeless.remove(&coord);
        self.remove(coord, physics)
    }

    /// Removes colliders whose chunk centre is farther than the cull distance.
    ///
    /// Returns the culled coordinates, sorted.
    pub fn update(&mut self, observer: Vec3, physics: &mut PhysicsWorld) -> Vec<ChunkCoord> {
        let mut culled: Vec<ChunkCoord> = self
            .active
            .keys()
            .copied()
            .filter(|&coord| !self.in_range(coord, observer))
            .collect();
        culled.sort();
        for &coord in &culled {
            self.remove(coord, physics);
        }
        if !culled.is_empty() {
            tracing::debug!("Culled {} colliders", culled.len());
        }
        culled
    }

    /// Detaches and disables the collider of `coord`.
    ///
    /// The handle goes back to the pool, or leaves the world if the pool is
    /// full. Returns `false` if `coord` had no collider.
    pub fn remove(&mut self, coord: ChunkCoord, physics: &mut PhysicsWorld) -> bool {
        let Some(handle) = self.active.remove(&coord) else {
            return false;
        };

        match physics.collider_set.get_mut(handle) {
            Some(collider) => {
                collider.set_shape(SharedShape::ball(PLACEHOLDER_RADIUS));
                collider.set_enabled(false);
                if let Err(handle) = self.pool.release(handle) {
                    physics.remove_collider(handle);
                }
            }
            None => tracing::warn!("Collider for {} vanished before removal", coord),
        }

        tracing::debug!("Collider removed for {}", coord);
        self.events.publish(WorldEvent::ColliderRemoved(coord));
        true
    }

    /// Removes every live collider.
    pub fn remove_all(&mut self, physics: &mut PhysicsWorld) {
        let mut coords: Vec<ChunkCoord> = self.active.keys().copied().collect();
        coords.sort();
        for coord in coords {
            self.remove(coord, physics);
        }
    }

    /// Forgets every memoized mesh. Live colliders are untouched.
    pub fn clear_cache(&mut self) {
        self.meshes.clear();
        self.shapeless.clear();
    }

    /// Removes every collider including pooled placeholders.
    pub fn dispose(&mut self, physics: &mut PhysicsWorld) {
        self.remove_all(physics);
        for handle in self.pool.drain() {
            physics.remove_collider(handle);
        }
        self.clear_cache();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether a chunk's centre is within the cull distance (horizontally).
    pub fn in_range(&self, coord: ChunkCoord, observer: Vec3) -> bool {
        let center = coord.center(self.settings.chunk_size);
        Vec2::new(center.x, center.z).distance(Vec2::new(observer.x, observer.z))
            <= self.settings.cull_distance
    }

    pub fn collider_for(&self, coord: ChunkCoord) -> Option<ColliderHandle> {
        self.active.get(&coord).copied()
    }

    pub fn cached_mesh(&self, coord: ChunkCoord) -> Option<&CollisionMesh> {
        self.meshes.get(&coord)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn cached_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    /// Collision meshes built from samples so far (cache hits excluded).
    pub fn mesh_build_count(&self) -> usize {
        self.mesh_builds
    }

    pub fn overflow_allocations(&self) -> usize {
        self.pool.overflow_allocations()
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
