use crate::{
    config::{DEFAULT_MASS, DEFAULT_RESTITUTION},
    utils::{allocator::EntityId, math},
};

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Physical state of a simulated body, decoupled from any scene transform.
///
/// `position` and `rotation` mirror an actor's transform (rotation as Euler
/// degrees) but only change through integration and collision response until a
/// bridging component copies them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec3,
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Accumulated force for the next tick; cleared after every integration.
    pub force: Vec3,
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia_tensor: Mat3,
    pub inv_inertia_tensor: Mat3,
    pub restitution: f32,
    pub is_static: bool,
    pub collider: Option<EntityId>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: DEFAULT_MASS,
            inv_mass: 1.0 / DEFAULT_MASS,
            inertia_tensor: Mat3::IDENTITY,
            inv_inertia_tensor: Mat3::IDENTITY,
            restitution: DEFAULT_RESTITUTION,
            is_static: false,
            collider: None,
        }
    }
}

impl RigidBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self.recompute_inv_mass();
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Adds `I⁻¹ · torque` straight to the angular velocity.
    pub fn apply_torque(&mut self, torque: Vec3) {
        let angular_acceleration = self.inv_inertia_tensor * torque;
        self.angular_velocity += angular_acceleration;
    }

    /// Orientation composed yaw (Y), pitch (X), roll (Z).
    ///
    /// The rotation components are passed through as radians, unlike
    /// transform matrices which convert from degrees first. Collision shapes
    /// are oriented by this matrix.
    pub fn orientation_matrix(&self) -> Mat3 {
        math::yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
    }

    /// Inverse mass as seen by collision response: zero for static bodies.
    pub fn effective_inv_mass(&self) -> f32 {
        if self.is_static {
            0.0
        } else {
            self.inv_mass
        }
    }

    pub fn recompute_inv_mass(&mut self) {
        self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
    }

    pub fn has_nan_position(&self) -> bool {
        self.position.is_nan()
    }
}
