//! Built-in components bridging actors to the physics world.

use glam::Vec3;
use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::{
    component::{Component, ComponentData},
    context::UpdateContext,
};
use crate::{
    config::{DEFAULT_MASS, DEFAULT_RESTITUTION},
    core::{collider::Collider, collider::ColliderShape, rigidbody::RigidBody},
    error::EngineError,
    utils::allocator::EntityId,
    world::PhysicsWorld,
};

fn save_fields<T: Serialize>(component: &T) -> ComponentData {
    match serde_json::to_value(component) {
        Ok(Value::Object(map)) => map,
        Ok(_) => ComponentData::new(),
        Err(err) => {
            warn!("failed to save component fields: {err}");
            ComponentData::new()
        }
    }
}

fn load_fields<T: DeserializeOwned>(name: &str, data: &ComponentData) -> Result<T, EngineError> {
    serde_json::from_value(Value::Object(data.clone())).map_err(|err| {
        EngineError::InvalidComponentData {
            component: name.to_string(),
            reason: err.to_string(),
        }
    })
}

/// Owns a rigid body in the physics world and keeps it in sync with the
/// actor's transform: transform to body in `update`, body to transform in
/// `late_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyComponent {
    pub mass: f32,
    pub restitution: f32,
    pub is_static: bool,
    #[serde(skip)]
    body: Option<EntityId>,
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            restitution: DEFAULT_RESTITUTION,
            is_static: false,
            body: None,
        }
    }
}

impl RigidBodyComponent {
    pub const TYPE_NAME: &'static str = "RigidBody";

    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            ..Self::default()
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Handle of the registered body; `None` before `start` and after `unload`.
    pub fn body(&self) -> Option<EntityId> {
        self.body
    }

    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        Some(physics.body(self.body?)?.velocity)
    }

    pub fn angular_velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        Some(physics.body(self.body?)?.angular_velocity)
    }

    pub fn apply_force(&self, physics: &mut PhysicsWorld, force: Vec3) -> bool {
        match self.body.and_then(|body| physics.body_mut(body)) {
            Some(body) => {
                body.apply_force(force);
                true
            }
            None => false,
        }
    }

    /// Puts the actor back at the origin with no motion.
    pub fn reset(&self, ctx: &mut UpdateContext<'_>) {
        if let Some(transform) = ctx.transform_mut() {
            transform.position = Vec3::ZERO;
            transform.rotation = Vec3::ZERO;
        }
        if let Some(body) = self.body.and_then(|body| ctx.physics.body_mut(body)) {
            body.position = Vec3::ZERO;
            body.rotation = Vec3::ZERO;
            body.velocity = Vec3::ZERO;
            body.angular_velocity = Vec3::ZERO;
        }
    }

    fn push_settings(&self, body: &mut RigidBody) {
        body.mass = self.mass;
        body.restitution = self.restitution;
        body.is_static = self.is_static;
        body.recompute_inv_mass();
    }
}

impl Component for RigidBodyComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn start(&mut self, ctx: &mut UpdateContext<'_>) {
        let mut body = RigidBody::default();
        if let Some(transform) = ctx.transform() {
            body.position = transform.position;
            body.rotation = transform.rotation;
        }
        self.push_settings(&mut body);
        self.body = Some(ctx.physics.add_body(body));
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let Some((position, rotation)) = ctx.transform().map(|t| (t.position, t.rotation)) else {
            return;
        };
        if let Some(body) = self.body.and_then(|body| ctx.physics.body_mut(body)) {
            self.push_settings(body);
            body.position = position;
            body.rotation = rotation;
        }
    }

    fn late_update(&mut self, ctx: &mut UpdateContext<'_>) {
        let Some((position, rotation)) = self
            .body
            .and_then(|body| ctx.physics.body(body))
            .map(|body| (body.position, body.rotation))
        else {
            return;
        };
        if let Some(transform) = ctx.transform_mut() {
            transform.position = position;
            transform.rotation = rotation;
        }
    }

    fn unload(&mut self, ctx: &mut UpdateContext<'_>) {
        if let Some(body) = self.body.take() {
            ctx.physics.remove_body(body);
        }
    }

    fn save(&self) -> ComponentData {
        save_fields(self)
    }

    fn load(&mut self, data: &ComponentData) -> Result<(), EngineError> {
        *self = load_fields(Self::TYPE_NAME, data)?;
        Ok(())
    }

    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(Self {
            body: None,
            ..self.clone()
        })
    }
}

/// Registers `collider` on start and binds it to the actor's rigid body.
fn bind_to_sibling_body(ctx: &mut UpdateContext<'_>, collider: EntityId) {
    let body = ctx
        .sibling::<RigidBodyComponent>()
        .and_then(RigidBodyComponent::body);
    if let Some(body) = body {
        ctx.physics.bind(collider, body);
    }
}

fn release_collider(ctx: &mut UpdateContext<'_>, collider: &mut Option<EntityId>) {
    if let Some(collider) = collider.take() {
        ctx.physics.remove_collider(collider);
    }
}

/// Oriented box collider. Each update the registered collider's size becomes
/// `size * global_scale / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxColliderComponent {
    pub size: Vec3,
    #[serde(skip)]
    collider: Option<EntityId>,
}

impl Default for BoxColliderComponent {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}

impl BoxColliderComponent {
    pub const TYPE_NAME: &'static str = "BoxCollider";

    pub fn new(size: Vec3) -> Self {
        Self {
            size,
            collider: None,
        }
    }

    pub fn collider(&self) -> Option<EntityId> {
        self.collider
    }
}

impl Component for BoxColliderComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn start(&mut self, ctx: &mut UpdateContext<'_>) {
        self.collider = Some(ctx.physics.add_collider(Collider::cuboid(self.size)));
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let Some(id) = self.collider else {
            return;
        };
        bind_to_sibling_body(ctx, id);

        let scale = ctx.actors.global_scale(ctx.actor).unwrap_or(Vec3::ONE);
        if let Some(collider) = ctx.physics.collider_mut(id) {
            collider.shape = ColliderShape::Box {
                size: self.size * (scale / 2.0),
            };
        }
    }

    fn unload(&mut self, ctx: &mut UpdateContext<'_>) {
        release_collider(ctx, &mut self.collider);
    }

    fn save(&self) -> ComponentData {
        save_fields(self)
    }

    fn load(&mut self, data: &ComponentData) -> Result<(), EngineError> {
        *self = load_fields(Self::TYPE_NAME, data)?;
        Ok(())
    }

    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(Self::new(self.size))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereColliderComponent {
    pub radius: f32,
    #[serde(skip)]
    collider: Option<EntityId>,
}

impl Default for SphereColliderComponent {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SphereColliderComponent {
    pub const TYPE_NAME: &'static str = "SphereCollider";

    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            collider: None,
        }
    }

    pub fn collider(&self) -> Option<EntityId> {
        self.collider
    }
}

impl Component for SphereColliderComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn start(&mut self, ctx: &mut UpdateContext<'_>) {
        self.collider = Some(ctx.physics.add_collider(Collider::sphere(self.radius)));
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let Some(id) = self.collider else {
            return;
        };
        bind_to_sibling_body(ctx, id);

        if let Some(collider) = ctx.physics.collider_mut(id) {
            collider.shape = ColliderShape::Sphere {
                radius: self.radius,
            };
        }
    }

    fn unload(&mut self, ctx: &mut UpdateContext<'_>) {
        release_collider(ctx, &mut self.collider);
    }

    fn save(&self) -> ComponentData {
        save_fields(self)
    }

    fn load(&mut self, data: &ComponentData) -> Result<(), EngineError> {
        *self = load_fields(Self::TYPE_NAME, data)?;
        Ok(())
    }

    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(Self::new(self.radius))
    }
}

/// Stand-in for a component implemented by an external scripting runtime.
/// Any number may be attached to one actor; fields round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptComponent {
    pub class_name: String,
    pub fields: ComponentData,
}

impl ScriptComponent {
    pub const TYPE_NAME: &'static str = "Script";

    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: ComponentData::new(),
        }
    }
}

impl Component for ScriptComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn allows_multiple(&self) -> bool {
        true
    }

    fn save(&self) -> ComponentData {
        save_fields(self)
    }

    fn load(&mut self, data: &ComponentData) -> Result<(), EngineError> {
        *self = load_fields(Self::TYPE_NAME, data)?;
        Ok(())
    }

    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}
