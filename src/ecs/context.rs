use log::warn;

use super::{
    actor::{Actor, ActorId},
    component::Component,
    registry::ActorRegistry,
    transform::Transform,
};
use crate::world::PhysicsWorld;

/// Everything a component may touch while one of its lifecycle hooks runs.
///
/// The component being called is detached from its actor for the duration of
/// the call, so sibling lookups through the context never alias `self`.
pub struct UpdateContext<'a> {
    pub actor: ActorId,
    pub actors: &'a mut ActorRegistry,
    pub physics: &'a mut PhysicsWorld,
    pub delta_time: f32,
}

impl<'a> UpdateContext<'a> {
    pub fn new(
        actor: ActorId,
        actors: &'a mut ActorRegistry,
        physics: &'a mut PhysicsWorld,
        delta_time: f32,
    ) -> Self {
        Self {
            actor,
            actors,
            physics,
            delta_time,
        }
    }

    /// Context for another actor, borrowing from this one.
    pub fn for_actor(&mut self, actor: ActorId) -> UpdateContext<'_> {
        UpdateContext {
            actor,
            actors: &mut *self.actors,
            physics: &mut *self.physics,
            delta_time: self.delta_time,
        }
    }

    pub fn owner(&self) -> Option<&Actor> {
        self.actors.get(self.actor)
    }

    pub fn owner_mut(&mut self) -> Option<&mut Actor> {
        self.actors.get_mut(self.actor)
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.owner().map(|actor| &actor.transform)
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.owner_mut().map(|actor| &mut actor.transform)
    }

    pub fn sibling<T: Component>(&self) -> Option<&T> {
        self.owner()?.get_component::<T>()
    }

    pub fn sibling_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.owner_mut()?.get_component_mut::<T>()
    }

    /// Removes a component from the owning actor and unloads it immediately.
    pub fn remove_component(&mut self, type_name: &str, index: usize) -> bool {
        let actor = self.actor;
        let Some(slot) = self.actors.detach_component(actor, type_name, index) else {
            warn!("no `{type_name}` #{index} on actor {actor:?} to remove");
            return false;
        };
        if let Some(mut component) = slot.component {
            component.unload(self);
        }
        true
    }
}
