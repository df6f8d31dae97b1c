use crate::ViewerError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Viewer settings. Every field has a default, so a YAML file only needs the
/// keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Geometry file to load at startup.
    pub model_path: PathBuf,
    /// Directory holding `vertex.wgsl` and `fragment.wgsl`. Built-in shaders
    /// are used when unset.
    pub shader_dir: Option<PathBuf>,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Linear RGBA.
    pub clear_color: [f64; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("output_model"),
            shader_dir: None,
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            clear_color: [0.52, 0.80, 0.92, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "meshview".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Start pose and handling. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    /// Degrees turned per pixel of pointer motion.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-2.0, -13.0, 10.0),
            yaw: -90.0,
            pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Vec3,
    pub position: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            position: Vec3::new(0.0, 1000.0, 1000.0),
        }
    }
}

impl ViewerConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ViewerError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Read a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&source)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
