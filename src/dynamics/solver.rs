use glam::Vec3;

use crate::{
    collision::contact::CollisionResult,
    config::{BOX_BOX_BIAS, SPHERE_BOX_BIAS, SPHERE_SPHERE_BIAS},
    core::rigidbody::RigidBody,
};

/// Impulse-based response for a single contact, with positional correction.
///
/// Every pair type follows the same steps: skip static/static pairs, push the
/// bodies apart along the normal by their inverse-mass share of
/// `depth * bias`, skip separating pairs, then apply the restitution impulse.
/// The `bias` per pair type is a tuning value:
/// box-box 0.2, sphere-box 0.8, sphere-sphere 0.5.
#[derive(Debug, Clone, Copy)]
pub struct CollisionSolver {
    pub box_box_bias: f32,
    pub sphere_box_bias: f32,
    pub sphere_sphere_bias: f32,
}

impl Default for CollisionSolver {
    fn default() -> Self {
        Self {
            box_box_bias: BOX_BOX_BIAS,
            sphere_box_bias: SPHERE_BOX_BIAS,
            sphere_sphere_bias: SPHERE_SPHERE_BIAS,
        }
    }
}

impl CollisionSolver {
    pub fn resolve_sphere_sphere(
        &self,
        a: &mut RigidBody,
        b: &mut RigidBody,
        collision: &CollisionResult,
    ) {
        // Angular response for spheres is intentionally not applied.
        Self::resolve_linear(a, b, collision, self.sphere_sphere_bias);
    }

    /// `sphere` must be the first body; the normal points from sphere to box.
    pub fn resolve_sphere_box(
        &self,
        sphere: &mut RigidBody,
        cuboid: &mut RigidBody,
        collision: &CollisionResult,
    ) {
        // Angular response for sphere-box contacts is intentionally not applied.
        Self::resolve_linear(sphere, cuboid, collision, self.sphere_box_bias);
    }

    /// Linear response plus an angular kick about the midpoint of the two
    /// corrected centers.
    pub fn resolve_box_box(
        &self,
        a: &mut RigidBody,
        b: &mut RigidBody,
        collision: &CollisionResult,
    ) {
        let Some(impulse) = Self::resolve_linear(a, b, collision, self.box_box_bias) else {
            return;
        };

        let half_depth = collision.normal * (collision.penetration_depth * 0.5);
        let center_a = a.position - half_depth;
        let center_b = b.position + half_depth;
        let contact_point = (center_a + center_b) * 0.5;

        let ra = contact_point - a.position;
        let rb = contact_point - b.position;

        let angular_a = a.inv_inertia_tensor * ra.cross(impulse);
        let angular_b = b.inv_inertia_tensor * rb.cross(impulse);

        if !a.is_static {
            a.apply_torque(angular_a);
        }
        if !b.is_static {
            b.apply_torque(angular_b);
        }
    }

    /// Shared positional correction and restitution impulse. Returns the
    /// impulse applied along the normal, or `None` when the pair was skipped
    /// (not colliding, both static, or already separating).
    fn resolve_linear(
        a: &mut RigidBody,
        b: &mut RigidBody,
        collision: &CollisionResult,
        bias: f32,
    ) -> Option<Vec3> {
        if !collision.is_colliding || (a.is_static && b.is_static) {
            return None;
        }

        let total_inverse_mass = a.effective_inv_mass() + b.effective_inv_mass();
        if total_inverse_mass == 0.0 {
            return None;
        }

        let correction = collision.normal * (collision.penetration_depth * bias);
        if !a.is_static {
            a.position -= correction * (a.inv_mass / total_inverse_mass);
        }
        if !b.is_static {
            b.position += correction * (b.inv_mass / total_inverse_mass);
        }

        let relative_velocity = b.velocity - a.velocity;
        let velocity_along_normal = relative_velocity.dot(collision.normal);
        if velocity_along_normal > 0.0 {
            return None;
        }

        let restitution = a.restitution.min(b.restitution);
        let magnitude = -(1.0 + restitution) * velocity_along_normal / total_inverse_mass;
        let impulse = collision.normal * magnitude;

        if !a.is_static {
            a.velocity -= impulse * a.inv_mass;
        }
        if !b.is_static {
            b.velocity += impulse * b.inv_mass;
        }

        Some(impulse)
    }
}
