use std::collections::HashMap;

use super::{
    component::Component,
    components::{
        BoxColliderComponent, RigidBodyComponent, ScriptComponent, SphereColliderComponent,
    },
    document::ComponentDocument,
};
use crate::error::EngineError;

pub type ComponentConstructor = fn() -> Box<dyn Component>;

fn construct<T: Component + Default>() -> Box<dyn Component> {
    Box::new(T::default())
}

/// String-keyed constructor registry used when loading scene documents.
#[derive(Debug, Clone, Default)]
pub struct ComponentFactory {
    constructors: HashMap<String, ComponentConstructor>,
}

impl ComponentFactory {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the rigid body, collider and script components.
    pub fn with_builtin() -> Self {
        let mut factory = Self::new();
        factory.register::<RigidBodyComponent>(RigidBodyComponent::TYPE_NAME);
        factory.register::<BoxColliderComponent>(BoxColliderComponent::TYPE_NAME);
        factory.register::<SphereColliderComponent>(SphereColliderComponent::TYPE_NAME);
        factory.register::<ScriptComponent>(ScriptComponent::TYPE_NAME);
        factory
    }

    pub fn register<T: Component + Default>(&mut self, type_name: impl Into<String>) {
        self.register_constructor(type_name, construct::<T>);
    }

    pub fn register_constructor(
        &mut self,
        type_name: impl Into<String>,
        constructor: ComponentConstructor,
    ) {
        self.constructors.insert(type_name.into(), constructor);
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn create(&self, type_name: &str) -> Result<Box<dyn Component>, EngineError> {
        self.constructors
            .get(type_name)
            .map(|constructor| constructor())
            .ok_or_else(|| EngineError::UnknownComponent(type_name.to_string()))
    }

    /// Creates the component named by `document` and loads its fields.
    pub fn build(&self, document: &ComponentDocument) -> Result<Box<dyn Component>, EngineError> {
        let mut component = self.create(&document.type_name)?;
        component.load(&document.fields)?;
        Ok(component)
    }
}
