use glam::Vec3;

use crate::{
    config::MAX_ANGULAR_VELOCITY,
    core::{collider::ColliderShape, rigidbody::RigidBody},
    utils::math,
};

/// Explicit Euler integrator advancing one body by one frame.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub max_angular_velocity: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(MAX_ANGULAR_VELOCITY)
    }
}

impl Integrator {
    pub fn new(max_angular_velocity: f32) -> Self {
        Self {
            max_angular_velocity,
        }
    }

    /// Advances `body` by `dt`.
    ///
    /// The force accumulator is consumed and cleared, then `gravity * mass` is
    /// queued for the following tick. Static bodies keep their position and
    /// velocity but still get their mass properties refreshed and force reset.
    pub fn integrate(
        &self,
        body: &mut RigidBody,
        shape: Option<&ColliderShape>,
        gravity: Vec3,
        dt: f32,
    ) {
        if let Some(shape) = shape {
            body.inertia_tensor = shape.inertia_tensor(body.mass);
            body.inv_inertia_tensor = math::inverse_or_zero(body.inertia_tensor);
        }

        body.recompute_inv_mass();

        if !body.is_static {
            if body.angular_velocity.length() > self.max_angular_velocity {
                body.angular_velocity =
                    body.angular_velocity.normalize() * self.max_angular_velocity;
            }

            body.velocity += (body.force / body.mass) * dt;
            body.velocity = math::zero_if_nan(body.velocity);

            body.position += body.velocity * dt;

            // Torque from the accumulated force is not integrated here; angular
            // velocity only changes through `apply_torque` during collision response.
            body.angular_velocity = math::zero_if_nan(body.angular_velocity);
            body.rotation += body.angular_velocity * dt;
        }

        body.force = Vec3::ZERO;
        body.apply_force(gravity * body.mass);
    }
}
