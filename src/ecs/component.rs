use std::any::{Any, TypeId};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{actor::ActorId, context::UpdateContext};
use crate::error::EngineError;

/// Field bag a component saves to and loads from a scene document.
pub type ComponentData = Map<String, Value>;

/// Downcasting support for [`Component`] trait objects.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour attached to an actor.
///
/// Lifecycle hooks run from the scene's frame traversal with an explicit
/// [`UpdateContext`]. `start` runs once, on the first frame the component is
/// visited, immediately before its first `update`.
pub trait Component: AsAny + 'static {
    /// Display name, also used as the document `type` key.
    fn type_name(&self) -> &'static str;

    fn start(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn late_update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Runs when the component is removed, its actor is deleted, or the scene unloads.
    fn unload(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Whether several instances may live on one actor.
    fn allows_multiple(&self) -> bool {
        false
    }

    fn save(&self) -> ComponentData {
        ComponentData::new()
    }

    fn load(&mut self, _data: &ComponentData) -> Result<(), EngineError> {
        Ok(())
    }

    /// Fresh copy for actor duplication. Runtime handles must not be shared.
    fn clone_component(&self) -> Box<dyn Component>;
}

/// One-way lifecycle marker gating `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Uninitialized,
    Initialized,
}

/// Per-attachment bookkeeping around a boxed component.
///
/// `component` is `None` only while the component is running one of its
/// lifecycle hooks.
pub struct ComponentSlot {
    pub(crate) uid: u64,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) entity: ActorId,
    pub(crate) component_index: usize,
    pub(crate) state: ComponentState,
    pub(crate) enabled: bool,
    pub(crate) component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub(crate) fn new(
        uid: u64,
        entity: ActorId,
        component_index: usize,
        component: Box<dyn Component>,
    ) -> Self {
        let type_id = component.as_ref().as_any().type_id();
        Self {
            uid,
            type_id,
            type_name: component.type_name(),
            entity,
            component_index,
            state: ComponentState::Uninitialized,
            enabled: true,
            component: Some(component),
        }
    }

    pub fn entity(&self) -> ActorId {
        self.entity
    }

    pub fn component_index(&self) -> usize {
        self.component_index
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is<T: Component>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn component(&self) -> Option<&dyn Component> {
        self.component.as_deref()
    }

    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.component.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.component.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("type_name", &self.type_name)
            .field("entity", &self.entity)
            .field("component_index", &self.component_index)
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .finish()
    }
}
