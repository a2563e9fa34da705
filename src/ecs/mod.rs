//! Actor/component scene model driving the physics world.

pub mod actor;
pub mod component;
pub mod components;
pub mod context;
pub mod document;
pub mod factory;
pub mod registry;
pub mod scene;
pub mod transform;

pub use actor::{Actor, ActorId};
pub use component::{Component, ComponentData, ComponentSlot, ComponentState};
pub use components::{
    BoxColliderComponent, RigidBodyComponent, ScriptComponent, SphereColliderComponent,
};
pub use context::UpdateContext;
pub use document::{ActorDocument, ComponentDocument, SceneDocument, TransformDocument};
pub use factory::{ComponentConstructor, ComponentFactory};
pub use registry::ActorRegistry;
pub use scene::Scene;
pub use transform::{Transform, TransformField};
