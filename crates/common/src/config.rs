use crate::types::{Projection, WindowConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use skyview_camera::{CameraSettings, MAX_PITCH};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the viewer reads at startup. Partial JSON files fall back to
/// defaults field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub projection: Projection,
    pub camera: CameraSettings,
    pub start_position: Vec3,
    /// Directory holding `skybox/` and `grass.jpg`.
    pub asset_root: PathBuf,
    /// Frame cap; 0 disables pacing.
    pub max_fps: u32,
    pub show_ground: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            projection: Projection::default(),
            camera: CameraSettings::default(),
            start_position: Vec3::ZERO,
            asset_root: PathBuf::from("assets"),
            max_fps: 60,
            show_ground: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }
        let p = &self.projection;
        if !(p.fov_y_degrees > 0.0 && p.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_y_degrees {} outside (0, 180)",
                p.fov_y_degrees
            )));
        }
        if !(p.near > 0.0 && p.far > p.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                p.near, p.far
            )));
        }
        let c = &self.camera;
        if !(c.pitch_limit > 0.0 && c.pitch_limit <= MAX_PITCH) {
            return Err(ConfigError::Invalid(format!(
                "pitch_limit {} outside (0, {MAX_PITCH}]",
                c.pitch_limit
            )));
        }
        if !c.speed.is_finite() || !c.mouse_sensitivity.is_finite() || !c.min_height.is_finite() {
            return Err(ConfigError::Invalid("camera settings must be finite".into()));
        }
        Ok(())
    }
}
