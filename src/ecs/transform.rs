use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use crate::{error::EngineError, utils::math};

/// Numeric field selector used by the scripting bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TransformField {
    Position = 0,
    Rotation = 1,
    Scale = 2,
}

impl TryFrom<i32> for TransformField {
    type Error = EngineError;

    fn try_from(kind: i32) -> Result<Self, Self::Error> {
        match kind {
            0 => Ok(Self::Position),
            1 => Ok(Self::Rotation),
            2 => Ok(Self::Scale),
            other => Err(EngineError::InvalidTransformField(other)),
        }
    }
}

/// Local spatial state of an actor.
///
/// `rotation` holds Euler angles in degrees. Parent and children are weak ids into
/// the scene's [`ActorRegistry`](super::registry::ActorRegistry); anything that
/// needs the ancestor chain (global position, world matrix) lives on the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub(crate) parent: Option<ActorId>,
    pub(crate) children: Vec<ActorId>,
    pub(crate) entity: ActorId,
}

impl Transform {
    pub(crate) fn new(entity: ActorId) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            parent: None,
            children: Vec::new(),
            entity,
        }
    }

    pub fn parent(&self) -> Option<ActorId> {
        self.parent
    }

    pub fn children(&self) -> &[ActorId] {
        &self.children
    }

    pub fn entity(&self) -> ActorId {
        self.entity
    }

    /// `translate(position) * rotate(rotation) * scale(scale)`, ignoring ancestors.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            math::quat_from_euler_degrees(self.rotation),
            self.position,
        )
    }

    /// Same as [`Transform::local_matrix`]; the world matrix is
    /// [`ActorRegistry::global_matrix`](super::registry::ActorRegistry::global_matrix).
    pub fn matrix(&self) -> Mat4 {
        self.local_matrix()
    }

    /// Rotates `point` by the local rotation, reading the stored angles as
    /// radians. Unlike the registry's `transform_point`, no degree conversion is
    /// applied here.
    pub fn local_transform_point(&self, point: Vec3) -> Vec3 {
        math::quat_from_euler(self.rotation) * point
    }

    /// Overwrites position, rotation and scale from a TRS matrix.
    pub fn copy_from_matrix(&mut self, matrix: Mat4) {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        self.position = translation;
        self.rotation = math::euler_degrees_from_quat(rotation);
        self.scale = scale;
    }
}
