use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::{rigidbody::RigidBody, types::InertiaTensorExt};
use crate::utils::allocator::EntityId;

/// Closed set of supported collider geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere {
        radius: f32,
    },
    /// `size` holds full extents; orientation comes from the bound body.
    Box {
        size: Vec3,
    },
}

impl ColliderShape {
    pub fn inertia_tensor(&self, mass: f32) -> Mat3 {
        match *self {
            ColliderShape::Sphere { radius } => Mat3::for_solid_sphere(radius, mass),
            ColliderShape::Box { size } => Mat3::for_solid_box(size, mass),
        }
    }
}

/// Collision shape registered with the physics world.
///
/// `body` is a weak handle: colliders may exist without a live body, in which
/// case they are ignored by collision detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    pub body: Option<EntityId>,
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            body: None,
        }
    }

    pub fn cuboid(size: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box { size },
            body: None,
        }
    }

    pub fn with_body(mut self, body: EntityId) -> Self {
        self.body = Some(body);
        self
    }

    /// Half extents for boxes, `None` for spheres.
    pub fn half_size(&self) -> Option<Vec3> {
        match self.shape {
            ColliderShape::Box { size } => Some(size * 0.5),
            ColliderShape::Sphere { .. } => None,
        }
    }

    /// World-space box corners for `body`, or `None` for spheres.
    pub fn box_vertices(&self, body: &RigidBody) -> Option<[Vec3; 8]> {
        let half = self.half_size()?;
        let orientation = body.orientation_matrix();
        let corners = [
            Vec3::new(-half.x, -half.y, -half.z),
            Vec3::new(half.x, -half.y, -half.z),
            Vec3::new(half.x, half.y, -half.z),
            Vec3::new(-half.x, half.y, -half.z),
            Vec3::new(-half.x, -half.y, half.z),
            Vec3::new(half.x, -half.y, half.z),
            Vec3::new(half.x, half.y, half.z),
            Vec3::new(-half.x, half.y, half.z),
        ];
        Some(corners.map(|corner| body.position + orientation * corner))
    }
}
