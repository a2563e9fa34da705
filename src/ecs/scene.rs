use std::collections::HashMap;

use glam::Vec3;
use log::{debug, warn};

use super::{
    actor::{Actor, ActorId},
    component::ComponentState,
    context::UpdateContext,
    document::{ActorDocument, ComponentDocument, SceneDocument, TransformDocument},
    factory::ComponentFactory,
    registry::ActorRegistry,
    transform::TransformField,
};
use crate::{error::EngineError, utils::logging::ScopedTimer, world::PhysicsWorld};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Update,
    LateUpdate,
}

/// An actor registry and the physics world its components drive.
///
/// One call to [`Scene::update`] is one frame:
/// 1. every active actor's enabled components get `start` (first visit only)
///    and `update`, in actor id order then attach order;
/// 2. the physics world integrates and resolves collisions;
/// 3. the same traversal calls `late_update`;
/// 4. actors queued for deletion are removed and their components unloaded.
///
/// Actors and components added during a pass are first visited on the next frame.
#[derive(Default)]
pub struct Scene {
    actors: ActorRegistry,
    physics: PhysicsWorld,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_physics(physics: PhysicsWorld) -> Self {
        Self {
            actors: ActorRegistry::new(),
            physics,
        }
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut ActorRegistry {
        &mut self.actors
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn create_actor(&mut self, name: impl Into<String>) -> ActorId {
        self.actors.create_actor(name)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// Context for calling into components of `actor` from outside the frame.
    pub fn context(&mut self, actor: ActorId, delta_time: f32) -> UpdateContext<'_> {
        UpdateContext::new(actor, &mut self.actors, &mut self.physics, delta_time)
    }

    pub fn update(&mut self, dt: f32) {
        {
            let _timer = ScopedTimer::new("scene::update");
            self.run_pass(Pass::Update, dt);
        }
        self.physics.update(dt);
        {
            let _timer = ScopedTimer::new("scene::late_update");
            self.run_pass(Pass::LateUpdate, dt);
        }
        let _timer = ScopedTimer::new("scene::flush_deletions");
        self.flush_deletions();
    }

    fn run_pass(&mut self, pass: Pass, dt: f32) {
        let count = self.actors.slot_count();
        for index in 0..count {
            let id = ActorId(index as u32);
            let Some(uids) = self.actors.get(id).map(Actor::component_uids) else {
                continue;
            };
            for uid in uids {
                if !self.actors.is_active(id) {
                    break;
                }
                self.run_component(id, uid, pass, dt);
            }
        }
    }

    fn run_component(&mut self, id: ActorId, uid: u64, pass: Pass, dt: f32) {
        let Some((mut component, state)) = self
            .actors
            .get_mut(id)
            .and_then(|actor| actor.check_out(uid))
        else {
            return;
        };

        let mut ctx = UpdateContext::new(id, &mut self.actors, &mut self.physics, dt);
        let state = match pass {
            Pass::Update => {
                if state == ComponentState::Uninitialized {
                    component.start(&mut ctx);
                }
                component.update(&mut ctx);
                ComponentState::Initialized
            }
            Pass::LateUpdate => {
                // Attached after this frame's update pass: wait for `start`.
                if state == ComponentState::Initialized {
                    component.late_update(&mut ctx);
                }
                state
            }
        };

        let restored = match self.actors.get_mut(id) {
            Some(actor) => actor.check_in(uid, component, state),
            None => Err(component),
        };
        if let Err(mut orphan) = restored {
            debug!("component `{}` removed during its own callback", orphan.type_name());
            orphan.unload(&mut self.context(id, dt));
        }
    }

    /// Removes every actor queued for deletion, unloading its components.
    pub fn flush_deletions(&mut self) {
        for id in self.actors.pending_deletions() {
            let slots = match self.actors.get_mut(id) {
                Some(actor) => actor.take_components(),
                None => continue,
            };
            for slot in slots {
                if let Some(mut component) = slot.component {
                    component.unload(&mut self.context(id, 0.0));
                }
            }
            self.actors.remove(id);
        }
    }

    /// Removes the `index`-th component named `type_name` from `actor` now.
    pub fn remove_component(&mut self, actor: ActorId, type_name: &str, index: usize) -> bool {
        self.context(actor, 0.0).remove_component(type_name, index)
    }

    pub fn duplicate_actor(&mut self, id: ActorId) -> Option<ActorId> {
        self.actors.duplicate(id)
    }

    /// Runs `unload` on every component in the scene. Actors stay in place.
    pub fn unload(&mut self) {
        for id in self.actors.ids() {
            let slots = match self.actors.get_mut(id) {
                Some(actor) => actor.take_components(),
                None => continue,
            };
            debug!("unloading {} components on {id:?}", slots.len());
            for mut slot in slots {
                if let Some(component) = slot.component.as_mut() {
                    component.unload(&mut self.context(id, 0.0));
                }
                slot.state = ComponentState::Uninitialized;
                if let Some(actor) = self.actors.get_mut(id) {
                    actor.components.push(slot);
                }
            }
        }
    }

    /// Scripting bridge read; `kind` is 0 position, 1 rotation, 2 scale.
    pub fn scripting_get(&self, id: ActorId, kind: i32) -> Result<Option<Vec3>, EngineError> {
        let field = TransformField::try_from(kind)?;
        Ok(self.actors.transform_value(id, field))
    }

    /// Scripting bridge write; `Ok(false)` for a stale actor id.
    pub fn scripting_set(
        &mut self,
        id: ActorId,
        kind: i32,
        value: Vec3,
    ) -> Result<bool, EngineError> {
        let field = TransformField::try_from(kind)?;
        Ok(self.actors.set_transform_value(id, field, value))
    }

    pub fn to_document(&self) -> SceneDocument {
        let ids = self.actors.ids();
        let index_of: HashMap<ActorId, usize> =
            ids.iter().enumerate().map(|(index, id)| (*id, index)).collect();

        let actors = ids
            .iter()
            .filter_map(|id| self.actors.get(*id))
            .map(|actor| {
                let transform = &actor.transform;
                ActorDocument {
                    name: actor.name.clone(),
                    enabled: actor.enabled,
                    transform: TransformDocument {
                        position: transform.position,
                        rotation: transform.rotation,
                        scale: transform.scale,
                        parent: transform.parent.and_then(|p| index_of.get(&p).copied()),
                        children: transform
                            .children
                            .iter()
                            .filter_map(|c| index_of.get(c).copied())
                            .collect(),
                    },
                    components: actor
                        .components
                        .iter()
                        .filter_map(|slot| {
                            let component = slot.component()?;
                            Some(ComponentDocument {
                                type_name: component.type_name().to_string(),
                                enabled: slot.is_enabled(),
                                fields: component.save(),
                            })
                        })
                        .collect(),
                }
            })
            .collect();

        SceneDocument { actors }
    }

    pub fn from_document(
        document: &SceneDocument,
        factory: &ComponentFactory,
    ) -> Result<Self, EngineError> {
        let mut scene = Self::new();
        scene.load_document(document, factory)?;
        Ok(scene)
    }

    /// Adds the document's actors to this scene, returning their new ids in
    /// document order. Nothing is added if any part of the document is invalid.
    pub fn load_document(
        &mut self,
        document: &SceneDocument,
        factory: &ComponentFactory,
    ) -> Result<Vec<ActorId>, EngineError> {
        document.validate()?;

        let mut built = Vec::with_capacity(document.actors.len());
        for actor in &document.actors {
            let components = actor
                .components
                .iter()
                .map(|doc| {
                    factory
                        .build(doc)
                        .map(|component| (component, doc.enabled))
                        .map_err(|err| {
                            warn!(
                                "cannot load component `{}` on `{}`: {err}",
                                doc.type_name, actor.name
                            );
                            err
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            built.push(components);
        }

        let mut ids = Vec::with_capacity(document.actors.len());
        for (doc, components) in document.actors.iter().zip(built) {
            let id = self.actors.create_actor(doc.name.clone());
            if let Some(actor) = self.actors.get_mut(id) {
                actor.enabled = doc.enabled;
                actor.transform.position = doc.transform.position;
                actor.transform.rotation = doc.transform.rotation;
                actor.transform.scale = doc.transform.scale;
                for (component, enabled) in components {
                    actor.attach_component_boxed(component).set_enabled(enabled);
                }
            }
            ids.push(id);
        }

        for (doc, &id) in document.actors.iter().zip(&ids) {
            if let Some(parent) = doc.transform.parent {
                self.actors.set_parent(id, Some(ids[parent]));
            }
        }

        debug!("loaded {} actors from document", ids.len());
        Ok(ids)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        self.to_document().to_json()
    }

    pub fn from_json(text: &str, factory: &ComponentFactory) -> Result<Self, EngineError> {
        Self::from_document(&SceneDocument::from_json(text)?, factory)
    }
}
