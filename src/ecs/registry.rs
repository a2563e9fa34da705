use std::collections::BTreeSet;

use glam::{Mat4, Vec3};
use log::{debug, warn};

use super::{
    actor::{Actor, ActorId},
    component::{Component, ComponentSlot},
    transform::TransformField,
};
use crate::utils::math;

/// Dense, id-indexed store of a scene's actors.
///
/// Slots are never reused: deleting an actor leaves a tombstone so its id keeps
/// resolving to `None` for the lifetime of the scene.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: Vec<Option<Actor>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_actor(&mut self, name: impl Into<String>) -> ActorId {
        let id = ActorId(self.actors.len() as u32);
        let actor = Actor::new(id, name);
        debug!("created actor {id:?} `{}`", actor.name);
        self.actors.push(Some(actor));
        id
    }

    /// Creates an actor already parented under `parent`.
    pub fn create_child(&mut self, name: impl Into<String>, parent: ActorId) -> ActorId {
        let id = self.create_actor(name);
        self.set_parent(id, Some(parent));
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    /// Number of ids handed out so far, live or not.
    pub fn slot_count(&self) -> usize {
        self.actors.len()
    }

    pub fn len(&self) -> usize {
        self.actors.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> + '_ {
        self.actors.iter().flatten().map(|actor| (actor.id(), actor))
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ActorId> {
        self.iter()
            .find(|(_, actor)| actor.name == name)
            .map(|(id, _)| id)
    }

    /// Live parent of `id`. A stale parent id reads as "no parent".
    pub fn parent_of(&self, id: ActorId) -> Option<ActorId> {
        self.get(id)?
            .transform
            .parent
            .filter(|parent| self.contains(*parent))
    }

    /// `id` followed by its live ancestors, leaf to root.
    fn chain(&self, id: ActorId) -> Vec<ActorId> {
        let mut chain = Vec::new();
        let mut current = Some(id).filter(|id| self.contains(*id));
        while let Some(node) = current {
            if chain.len() > self.actors.len() {
                warn!("parent cycle detected at actor {node:?}");
                break;
            }
            chain.push(node);
            current = self.parent_of(node);
        }
        chain
    }

    /// Reparents `child` under `parent` (or to the root for `None`).
    ///
    /// Keeps both sides of the link consistent: the child leaves its old
    /// parent's children list and appears exactly once in the new one. A stale
    /// `parent` is treated as the root. Returns `false`, leaving the hierarchy
    /// untouched, for a stale child or when the move would create a cycle.
    pub fn set_parent(&mut self, child: ActorId, parent: Option<ActorId>) -> bool {
        if !self.contains(child) {
            warn!("set_parent on stale actor {child:?}");
            return false;
        }

        let parent = match parent {
            Some(parent) if !self.contains(parent) => {
                warn!("set_parent to stale actor {parent:?}, re-rooting {child:?}");
                None
            }
            other => other,
        };

        if let Some(parent) = parent {
            if self.chain(parent).contains(&child) {
                warn!("rejected reparenting {child:?} under its own descendant {parent:?}");
                return false;
            }
        }

        if let Some(old) = self.parent_of(child) {
            if let Some(old) = self.get_mut(old) {
                old.transform.children.retain(|c| *c != child);
            }
        }

        if let Some(actor) = self.get_mut(child) {
            actor.transform.parent = parent;
        }

        if let Some(new) = parent.and_then(|parent| self.get_mut(parent)) {
            if !new.transform.children.contains(&child) {
                new.transform.children.push(child);
            }
        }
        true
    }

    pub fn global_position(&self, id: ActorId) -> Option<Vec3> {
        self.fold(id, Vec3::ZERO, |acc, actor| acc + actor.transform.position)
    }

    /// Sum of local Euler rotations up the chain, in degrees.
    pub fn global_rotation(&self, id: ActorId) -> Option<Vec3> {
        self.fold(id, Vec3::ZERO, |acc, actor| acc + actor.transform.rotation)
    }

    pub fn global_scale(&self, id: ActorId) -> Option<Vec3> {
        self.fold(id, Vec3::ONE, |acc, actor| acc * actor.transform.scale)
    }

    /// World matrix: parent world matrix times the local matrix, recomputed on
    /// every call.
    pub fn global_matrix(&self, id: ActorId) -> Option<Mat4> {
        let chain = self.chain(id);
        if chain.is_empty() {
            return None;
        }
        let matrix = chain
            .iter()
            .rev()
            .filter_map(|id| self.get(*id))
            .fold(Mat4::IDENTITY, |acc, actor| acc * actor.transform.local_matrix());
        Some(matrix)
    }

    fn fold(&self, id: ActorId, init: Vec3, f: impl Fn(Vec3, &Actor) -> Vec3) -> Option<Vec3> {
        let chain = self.chain(id);
        if chain.is_empty() {
            return None;
        }
        Some(chain.iter().filter_map(|id| self.get(*id)).fold(init, f))
    }

    /// Rotates `point` by the actor's global rotation.
    pub fn transform_point(&self, id: ActorId, point: Vec3) -> Option<Vec3> {
        let rotation = self.global_rotation(id)?;
        Some(math::quat_from_euler_degrees(rotation) * point)
    }

    pub fn up(&self, id: ActorId) -> Option<Vec3> {
        self.transform_point(id, Vec3::Y)
    }

    pub fn forward(&self, id: ActorId) -> Option<Vec3> {
        self.transform_point(id, Vec3::Z)
    }

    pub fn right(&self, id: ActorId) -> Option<Vec3> {
        self.transform_point(id, Vec3::X)
    }

    /// An actor is effectively enabled only when it and every live ancestor are.
    pub fn is_enabled_in_hierarchy(&self, id: ActorId) -> bool {
        let chain = self.chain(id);
        !chain.is_empty()
            && chain
                .iter()
                .filter_map(|id| self.get(*id))
                .all(|actor| actor.enabled)
    }

    pub fn set_enabled(&mut self, id: ActorId, enabled: bool) -> bool {
        match self.get_mut(id) {
            Some(actor) => {
                actor.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Live, effectively enabled and not queued for deletion.
    pub(crate) fn is_active(&self, id: ActorId) -> bool {
        self.get(id)
            .is_some_and(|actor| !actor.is_queued_for_delete())
            && self.is_enabled_in_hierarchy(id)
    }

    /// First `T` found on the actor itself or, failing that, its nearest ancestor.
    pub fn get_component_in_parent<T: Component>(&self, id: ActorId) -> Option<&T> {
        self.chain(id)
            .into_iter()
            .filter_map(|id| self.get(id))
            .find_map(|actor| actor.get_component::<T>())
    }

    /// Every descendant: direct children first, then each child's subtree.
    pub fn recursive_children(&self, id: ActorId) -> Vec<ActorId> {
        let mut result = Vec::new();
        self.collect_children(id, &mut result);
        result
    }

    fn collect_children(&self, id: ActorId, result: &mut Vec<ActorId>) {
        let Some(actor) = self.get(id) else {
            return;
        };
        let children: Vec<_> = actor
            .transform
            .children
            .iter()
            .copied()
            .filter(|child| self.contains(*child) && !result.contains(child))
            .collect();
        result.extend(&children);
        for child in children {
            self.collect_children(child, result);
        }
    }

    /// Descendant named exactly `name`, checking direct children before going deeper.
    pub fn find_child(&self, id: ActorId, name: &str) -> Option<ActorId> {
        self.recursive_children(id)
            .into_iter()
            .find(|child| self.get(*child).is_some_and(|actor| actor.name == name))
    }

    /// Like [`ActorRegistry::find_child`], matching names that contain `fragment`.
    pub fn find_child_containing(&self, id: ActorId, fragment: &str) -> Option<ActorId> {
        self.recursive_children(id).into_iter().find(|child| {
            self.get(*child)
                .is_some_and(|actor| actor.name.contains(fragment))
        })
    }

    pub fn transform_value(&self, id: ActorId, field: TransformField) -> Option<Vec3> {
        let transform = &self.get(id)?.transform;
        Some(match field {
            TransformField::Position => transform.position,
            TransformField::Rotation => transform.rotation,
            TransformField::Scale => transform.scale,
        })
    }

    pub fn set_transform_value(&mut self, id: ActorId, field: TransformField, value: Vec3) -> bool {
        let Some(actor) = self.get_mut(id) else {
            return false;
        };
        let transform = &mut actor.transform;
        match field {
            TransformField::Position => transform.position = value,
            TransformField::Rotation => transform.rotation = value,
            TransformField::Scale => transform.scale = value,
        }
        true
    }

    /// Queues `id` for deletion at the end of the frame.
    pub fn delete(&mut self, id: ActorId) -> bool {
        self.get_mut(id).map(Actor::delete).is_some()
    }

    /// Queues `id` and its subtree for deletion at the end of the frame.
    pub fn delete_recursive(&mut self, id: ActorId) -> bool {
        self.get_mut(id).map(Actor::delete_recursive).is_some()
    }

    /// Every id the next compaction pass will remove, in id order.
    pub(crate) fn pending_deletions(&self) -> Vec<ActorId> {
        let mut pending = BTreeSet::new();
        for (id, actor) in self.iter() {
            if actor.queued_for_delete_recursive {
                pending.insert(id);
                pending.extend(self.recursive_children(id));
            } else if actor.queued_for_delete {
                pending.insert(id);
            }
        }
        pending.into_iter().collect()
    }

    /// Removes `id` immediately, unlinking it from its parent and re-rooting
    /// its children. Components are returned still attached; the caller is
    /// responsible for unloading them.
    pub(crate) fn remove(&mut self, id: ActorId) -> Option<Actor> {
        if let Some(parent) = self.parent_of(id) {
            if let Some(parent) = self.get_mut(parent) {
                parent.transform.children.retain(|c| *c != id);
            }
        }

        let children = self.get(id)?.transform.children.clone();
        for child in children {
            if let Some(child) = self.get_mut(child) {
                if child.transform.parent == Some(id) {
                    child.transform.parent = None;
                }
            }
        }

        let actor = self.actors.get_mut(id.index())?.take();
        debug!("deleted actor {id:?}");
        actor
    }

    pub(crate) fn detach_component(
        &mut self,
        id: ActorId,
        type_name: &str,
        index: usize,
    ) -> Option<ComponentSlot> {
        self.get_mut(id)?.detach_component(type_name, index)
    }

    /// Deep copy of `id` as a new root actor: transform values, fresh component
    /// clones (uninitialized), and duplicated children parented to the copy.
    pub fn duplicate(&mut self, id: ActorId) -> Option<ActorId> {
        let source = self.get(id)?;
        let name = source.name.clone();
        let enabled = source.enabled;
        let (position, rotation, scale) = (
            source.transform.position,
            source.transform.rotation,
            source.transform.scale,
        );
        let children = source.transform.children.clone();
        let components = source.clone_components();

        let copy = self.create_actor(name);
        if let Some(actor) = self.get_mut(copy) {
            actor.enabled = enabled;
            actor.transform.position = position;
            actor.transform.rotation = rotation;
            actor.transform.scale = scale;
            for (component, component_enabled) in components {
                actor.attach_component_boxed(component).enabled = component_enabled;
            }
        }

        for child in children {
            if let Some(child_copy) = self.duplicate(child) {
                self.set_parent(child_copy, Some(copy));
            }
        }
        Some(copy)
    }
}
