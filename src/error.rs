//! Error type for the fallible boundaries of the crate (documents, configuration,
//! scripting bridge). Frame-time conditions never produce errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scene document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown component type `{0}`")]
    UnknownComponent(String),

    #[error("component `{component}` rejected its data: {reason}")]
    InvalidComponentData { component: String, reason: String },

    #[error("invalid hierarchy in scene document: {0}")]
    InvalidHierarchy(String),

    #[error("invalid transform field kind {0} (expected 0, 1 or 2)")]
    InvalidTransformField(i32),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
