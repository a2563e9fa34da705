//! Engine constants and the loadable [`EngineConfig`].

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Default gravity vector applied by the physics world (Y-up, halved Earth gravity).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81 / 2.0, 0.0];

/// Default frame delta used when no explicit timestep is configured (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Frame budget used by [`crate::Engine::tick`] to warn about slow frames.
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.6;

/// Ceiling applied to a body's angular velocity magnitude before integration.
pub const MAX_ANGULAR_VELOCITY: f32 = 10.0;

/// Mass assigned to freshly created bodies.
pub const DEFAULT_MASS: f32 = 1.0;

/// Restitution assigned to freshly created bodies.
pub const DEFAULT_RESTITUTION: f32 = 0.5;

/// Positional correction factor for box-box contacts.
pub const BOX_BOX_BIAS: f32 = 0.2;

/// Positional correction factor for sphere-box contacts.
pub const SPHERE_BOX_BIAS: f32 = 0.8;

/// Positional correction factor for sphere-sphere contacts.
pub const SPHERE_SPHERE_BIAS: f32 = 0.5;

/// Cross-product axes shorter than this are treated as parallel edges by SAT.
pub const AXIS_EPSILON: f32 = f32::EPSILON;

/// Runtime configuration for an [`crate::Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gravity: Vec3,
    pub time_step: f32,
    pub frame_budget_ms: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            time_step: DEFAULT_TIME_STEP,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Renders the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(EngineError::Config(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if !self.gravity.is_finite() {
            return Err(EngineError::Config("gravity must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = EngineConfig::from_toml_str("time_step = 0.5\n").unwrap();
        assert_eq!(config.time_step, 0.5);
        assert_eq!(config.gravity, Vec3::from_array(DEFAULT_GRAVITY));
    }

    #[test]
    fn gravity_parses_as_array() {
        let config = EngineConfig::from_toml_str("gravity = [0.0, -1.0, 0.0]\n").unwrap();
        assert_eq!(config.gravity, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn rejects_non_positive_time_step() {
        assert!(EngineConfig::from_toml_str("time_step = 0.0\n").is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
