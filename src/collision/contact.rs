use glam::Vec3;
use serde::Serialize;

use crate::utils::allocator::EntityId;

/// Outcome of a pairwise collision query.
///
/// `normal` points from the first shape toward the second; for mixed
/// sphere/box pairs it always points from the sphere toward the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionResult {
    pub is_colliding: bool,
    pub normal: Vec3,
    /// Overlap along `normal`; `-1.0` when no contact was found.
    pub penetration_depth: f32,
    pub main: Option<EntityId>,
    pub other: Option<EntityId>,
}

impl Default for CollisionResult {
    fn default() -> Self {
        Self::none()
    }
}

impl CollisionResult {
    pub fn none() -> Self {
        Self {
            is_colliding: false,
            normal: Vec3::ZERO,
            penetration_depth: -1.0,
            main: None,
            other: None,
        }
    }

    pub fn contact(normal: Vec3, penetration_depth: f32) -> Self {
        Self {
            is_colliding: true,
            normal,
            penetration_depth,
            main: None,
            other: None,
        }
    }

    pub fn between(mut self, main: EntityId, other: EntityId) -> Self {
        self.main = Some(main);
        self.other = Some(other);
        self
    }
}
