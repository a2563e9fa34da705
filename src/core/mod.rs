//! Physics data: rigid bodies, collider shapes, and mass-property helpers.

pub mod collider;
pub mod rigidbody;
pub mod types;

pub use collider::{Collider, ColliderShape};
pub use rigidbody::RigidBody;
pub use types::InertiaTensorExt;
