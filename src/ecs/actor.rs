use serde::{Deserialize, Serialize};

use super::{
    component::{Component, ComponentSlot, ComponentState},
    transform::Transform,
};

/// Scene-scoped actor handle. Assigned from the registry length at insertion and
/// never reused, so a stale id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Named entity owning a [`Transform`] and an ordered list of components.
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    pub name: String,
    pub(crate) enabled: bool,
    pub transform: Transform,
    pub(crate) components: Vec<ComponentSlot>,
    pub(crate) queued_for_delete: bool,
    pub(crate) queued_for_delete_recursive: bool,
    next_component_uid: u64,
}

impl Actor {
    pub(crate) fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            transform: Transform::new(id),
            components: Vec::new(),
            queued_for_delete: false,
            queued_for_delete_recursive: false,
            next_component_uid: 0,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// The actor's own flag. The effective state is
    /// [`ActorRegistry::is_enabled_in_hierarchy`](super::registry::ActorRegistry).
    pub fn is_enabled_self(&self) -> bool {
        self.enabled
    }

    /// Sets the actor flag and every component's enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        for slot in &mut self.components {
            slot.enabled = enabled;
        }
    }

    /// Queues the actor for removal after the current frame. Children are
    /// re-rooted, not deleted.
    pub fn delete(&mut self) {
        self.queued_for_delete = true;
    }

    /// Queues the actor and its whole subtree for removal after the current frame.
    pub fn delete_recursive(&mut self) {
        self.queued_for_delete_recursive = true;
    }

    pub fn is_queued_for_delete(&self) -> bool {
        self.queued_for_delete || self.queued_for_delete_recursive
    }

    /// Attaches `component`, unless a component of the same type is already
    /// present and the type does not allow multiple instances; then the existing
    /// one is returned and `component` is dropped.
    ///
    /// Returns `None` only when the matching component is currently running a
    /// lifecycle hook.
    pub fn attach_component<T: Component>(&mut self, component: T) -> Option<&mut T> {
        let position = self.attach_at(Box::new(component));
        self.components[position].downcast_mut::<T>()
    }

    /// Type-erased attach with the same uniqueness rule, for factory-built components.
    pub fn attach_component_boxed(&mut self, component: Box<dyn Component>) -> &mut ComponentSlot {
        let position = self.attach_at(component);
        &mut self.components[position]
    }

    fn attach_at(&mut self, component: Box<dyn Component>) -> usize {
        let type_id = component.as_ref().as_any().type_id();

        if !component.allows_multiple() {
            if let Some(existing) = self.components.iter().position(|s| s.type_id == type_id) {
                return existing;
            }
        }

        let component_index = self
            .components
            .iter()
            .filter(|slot| slot.type_id == type_id)
            .map(|slot| slot.component_index + 1)
            .max()
            .unwrap_or(0);

        let uid = self.next_component_uid;
        self.next_component_uid += 1;
        self.components
            .push(ComponentSlot::new(uid, self.id, component_index, component));
        self.components.len() - 1
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.components.iter().any(|slot| slot.is::<T>())
    }

    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.get_component_at::<T>(0)
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.get_component_at_mut::<T>(0)
    }

    /// The `index`-th component of type `T` in attach order.
    pub fn get_component_at<T: Component>(&self, index: usize) -> Option<&T> {
        self.components
            .iter()
            .filter(|slot| slot.is::<T>())
            .nth(index)?
            .downcast_ref::<T>()
    }

    pub fn get_component_at_mut<T: Component>(&mut self, index: usize) -> Option<&mut T> {
        self.components
            .iter_mut()
            .filter(|slot| slot.is::<T>())
            .nth(index)?
            .downcast_mut::<T>()
    }

    pub fn get_components<T: Component>(&self) -> impl Iterator<Item = &T> + '_ {
        self.components
            .iter()
            .filter_map(|slot| slot.downcast_ref::<T>())
    }

    pub fn get_components_mut<T: Component>(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.components
            .iter_mut()
            .filter_map(|slot| slot.downcast_mut::<T>())
    }

    pub fn components(&self) -> &[ComponentSlot] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [ComponentSlot] {
        &mut self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Detaches the `index`-th component whose display name is `type_name`.
    pub(crate) fn detach_component(
        &mut self,
        type_name: &str,
        index: usize,
    ) -> Option<ComponentSlot> {
        let position = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.type_name == type_name)
            .nth(index)
            .map(|(position, _)| position)?;
        Some(self.components.remove(position))
    }

    pub(crate) fn take_components(&mut self) -> Vec<ComponentSlot> {
        std::mem::take(&mut self.components)
    }

    /// Takes the component out of slot `uid` for a lifecycle call. Disabled
    /// slots and slots already checked out yield `None`.
    pub(crate) fn check_out(&mut self, uid: u64) -> Option<(Box<dyn Component>, ComponentState)> {
        let slot = self
            .components
            .iter_mut()
            .find(|slot| slot.uid == uid && slot.enabled)?;
        let component = slot.component.take()?;
        Some((component, slot.state))
    }

    /// Returns a checked-out component to its slot. Hands it back if the slot
    /// was removed in the meantime.
    pub(crate) fn check_in(
        &mut self,
        uid: u64,
        component: Box<dyn Component>,
        state: ComponentState,
    ) -> Result<(), Box<dyn Component>> {
        match self.components.iter_mut().find(|slot| slot.uid == uid) {
            Some(slot) => {
                slot.component = Some(component);
                slot.state = state;
                Ok(())
            }
            None => Err(component),
        }
    }

    pub(crate) fn component_uids(&self) -> Vec<u64> {
        self.components.iter().map(|slot| slot.uid).collect()
    }

    /// Fresh copies of every component for duplication, in attach order.
    pub(crate) fn clone_components(&self) -> Vec<(Box<dyn Component>, bool)> {
        self.components
            .iter()
            .filter_map(|slot| {
                let component = slot.component.as_deref()?;
                Some((component.clone_component(), slot.enabled))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Health(u32);

    impl Component for Health {
        fn type_name(&self) -> &'static str {
            "Health"
        }

        fn clone_component(&self) -> Box<dyn Component> {
            Box::new(self.clone())
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Tag(&'static str);

    impl Component for Tag {
        fn type_name(&self) -> &'static str {
            "Tag"
        }

        fn allows_multiple(&self) -> bool {
            true
        }

        fn clone_component(&self) -> Box<dyn Component> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn duplicate_attach_returns_existing_instance() {
        let mut actor = Actor::new(ActorId(0), "player");
        actor.attach_component(Health(10));
        let again = actor.attach_component(Health(99)).unwrap();

        assert_eq!(again.0, 10);
        assert_eq!(actor.component_count(), 1);
    }

    #[test]
    fn multi_instance_components_get_increasing_indices() {
        let mut actor = Actor::new(ActorId(0), "player");
        actor.attach_component(Tag("a"));
        actor.attach_component(Tag("b"));

        let indices: Vec<_> = actor.components().iter().map(|s| s.component_index()).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(actor.get_component_at::<Tag>(1).unwrap().0, "b");
        assert_eq!(actor.get_components::<Tag>().count(), 2);
        assert!(actor.get_component_at::<Tag>(2).is_none());
    }

    #[test]
    fn detach_by_name_and_index() {
        let mut actor = Actor::new(ActorId(3), "player");
        actor.attach_component(Tag("a"));
        actor.attach_component(Health(1));
        actor.attach_component(Tag("b"));

        let removed = actor.detach_component("Tag", 1).unwrap();
        assert_eq!(removed.entity(), ActorId(3));
        assert_eq!(actor.get_components::<Tag>().count(), 1);
        assert_eq!(actor.get_component::<Tag>().unwrap().0, "a");
        assert!(actor.detach_component("Tag", 5).is_none());
    }

    #[test]
    fn set_enabled_propagates_to_components() {
        let mut actor = Actor::new(ActorId(0), "player");
        actor.attach_component(Health(1));
        actor.set_enabled(false);

        assert!(!actor.is_enabled_self());
        assert!(actor.components().iter().all(|slot| !slot.is_enabled()));
    }

    #[test]
    fn checked_out_component_is_invisible_to_lookups() {
        let mut actor = Actor::new(ActorId(0), "player");
        actor.attach_component(Health(5));
        let uid = actor.component_uids()[0];

        let (component, state) = actor.check_out(uid).unwrap();
        assert_eq!(state, ComponentState::Uninitialized);
        assert!(actor.get_component::<Health>().is_none());
        assert!(actor.has_component::<Health>());

        assert!(actor
            .check_in(uid, component, ComponentState::Initialized)
            .is_ok());
        assert_eq!(actor.components()[0].state(), ComponentState::Initialized);
    }
}
