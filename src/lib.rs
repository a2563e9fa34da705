//! Actor Dynamics – actor/component scenes with rigid-body physics.
//!
//! Scenes hold named actors with transforms and components; a per-scene
//! physics world integrates rigid bodies and resolves sphere/box collisions
//! between the component update and late-update passes.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod ecs;
pub mod error;
pub mod utils;
pub mod world;

use std::time::Instant;

pub use glam::{Mat3, Mat4, Quat, Vec3};

pub use collision::{contact::CollisionResult, narrowphase::NarrowPhase};
pub use config::EngineConfig;
pub use crate::core::{
    collider::{Collider, ColliderShape},
    rigidbody::RigidBody,
};
pub use dynamics::{integrator::Integrator, solver::CollisionSolver};
pub use ecs::{
    Actor, ActorId, ActorRegistry, BoxColliderComponent, Component, ComponentData,
    ComponentFactory, ComponentState, RigidBodyComponent, Scene, SceneDocument, ScriptComponent,
    SphereColliderComponent, UpdateContext,
};
pub use error::EngineError;
pub use utils::allocator::{Arena, EntityId, GenerationalId};
pub use world::{DebugShape, PhysicsWorld};

/// High-level convenience wrapper that owns the active [`Scene`].
pub struct Engine {
    scene: Scene,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Creates an engine with an empty scene whose physics uses `config.gravity`.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scene: Scene::with_physics(PhysicsWorld::with_gravity(config.gravity)),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Replaces the active scene, unloading the old one first.
    pub fn load_scene(&mut self, mut scene: Scene) -> Scene {
        self.scene.unload();
        std::mem::swap(&mut self.scene, &mut scene);
        scene
    }

    /// Runs one frame with the given delta time. Returns `true` if the frame
    /// went over the configured budget.
    pub fn tick(&mut self, dt: f32) -> bool {
        let start = Instant::now();
        self.scene.update(dt);
        utils::logging::warn_if_frame_budget_exceeded(start.elapsed(), self.config.frame_budget_ms)
    }

    /// Runs one frame with the configured fixed time step.
    pub fn step(&mut self) -> bool {
        self.tick(self.config.time_step)
    }
}
