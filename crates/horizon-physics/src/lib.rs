//! Physics integration: the rapier world, reduced collision geometry for
//! streamed chunks, and a ray-cast backed obstruction probe.
//!
//! [`PhysicsWorld`] owns all rapier state. The [`CollisionGeometryCache`]
//! turns chunk samples into coarse static colliders drawn from a handle pool,
//! and [`PhysicsProbe`] answers clearance and sweep queries for navigation.

mod cache;
mod collision_mesh;
mod error;
mod probe;

pub use cache::{CollisionGeometryCache, CollisionSettings};
pub use collision_mesh::{CollisionMesh, build_collision_mesh};
pub use error::CollisionError;
pub use probe::PhysicsProbe;

use rapier3d::prelude::*;

/// Converts a glam vector into rapier's vector type.
pub fn to_vector(v: glam::Vec3) -> Vector {
    Vector::new(v.x, v.y, v.z)
}

/// Central physics state owning every rapier set.
///
/// Terrain colliders are static, so stepping mostly serves to bring the
/// broad phase up to date; ray queries see colliders as of the last
/// [`step`](Self::step).
pub struct PhysicsWorld {
    pub gravity: Vector,
    /// Fixed `1/60` s step; terrain never integrates, so only `dt` matters.
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    /// Unused by static terrain but required by collider removal.
    pub island_manager: IslandManager,
    /// Bounding-volume tree over chunk colliders; ray casts run against it.
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    /// Empty: chunk colliders are attached to no body.
    pub rigid_body_set: RigidBodySet,
    /// Chunk colliders, live and pooled (pooled ones are disabled).
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Creates an empty world with gravity `(0, -9.81, 0)` and a `1/60` s step.
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: 1.0 / 60.0,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, -9.81, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Runs one pipeline step, refreshing the broad phase after collider changes.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Casts a ray and returns the distance to the first hit, if any.
    ///
    /// `dir` does not need to be normalized; the distance is in units of
    /// `dir`'s length.
    pub fn cast_ray(&self, origin: glam::Vec3, dir: glam::Vec3, max_distance: f32) -> Option<f32> {
        let query_pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.rigid_body_set,
            &self.collider_set,
            QueryFilter::default(),
        );
        let ray = Ray::new(to_vector(origin), to_vector(dir));
        query_pipeline
            .cast_ray(&ray, max_distance, true)
            .map(|(_, toi)| toi)
    }

    /// Removes a collider permanently.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// Number of colliders in the set, enabled or not.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Number of enabled colliders.
    pub fn enabled_collider_count(&self) -> usize {
        self.collider_set.iter().filter(|(_, c)| c.is_enabled()).count()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
