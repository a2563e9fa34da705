//! Serializable scene layout.
//!
//! Actors are stored as a flat list; hierarchy links are indices into that
//! list, so ids never leak into saved files.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::component::ComponentData;
use crate::error::EngineError;

fn enabled_by_default() -> bool {
    true
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub actors: Vec<ActorDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDocument {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub transform: TransformDocument,
    #[serde(default)]
    pub components: Vec<ComponentDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformDocument {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub children: Vec<usize>,
}

impl Default for TransformDocument {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// One component: its factory key plus whatever fields it saved.
///
/// Saved fields live in their own `fields` object so a component may use any
/// key, including `type` and `enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDocument {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "ComponentData::is_empty")]
    pub fields: ComponentData,
}

impl SceneDocument {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every parent/child index points inside the document.
    pub fn validate(&self) -> Result<(), EngineError> {
        let count = self.actors.len();
        for (index, actor) in self.actors.iter().enumerate() {
            let links = actor.transform.parent.iter().chain(&actor.transform.children);
            for &link in links {
                if link >= count {
                    return Err(EngineError::InvalidHierarchy(format!(
                        "actor {index} (`{}`) links to index {link}, past the last of {count}",
                        actor.name
                    )));
                }
                if link == index {
                    return Err(EngineError::InvalidHierarchy(format!(
                        "actor {index} (`{}`) links to itself",
                        actor.name
                    )));
                }
            }
        }
        Ok(())
    }
}
