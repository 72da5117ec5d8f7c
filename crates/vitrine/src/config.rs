//! Viewer configuration (JSON).
//!
//! Every field has a default, so an empty object `{}` or no file at all
//! yields the stock desk scene. A file only needs the keys it changes:
//!
//! ```json
//! {
//!   "window": { "width": 1280, "height": 720 },
//!   "tessellation": { "sectors": 48, "stacks": 24, "smooth": false }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::camera::FlyCamera;
use crate::math::Vec3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub tessellation: TessellationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory the scene's image files are loaded from.
    pub texture_dir: PathBuf,
    /// Linear RGBA.
    pub clear_color: [f64; 4],
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

/// Detail used for every curved shape in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub sectors: u32,
    pub stacks: u32,
    pub smooth: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vitrine".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: crate::camera::DEFAULT_YAW,
            pitch: crate::camera::DEFAULT_PITCH,
            speed: crate::camera::DEFAULT_SPEED,
            sensitivity: crate::camera::DEFAULT_SENSITIVITY,
            zoom: crate::camera::DEFAULT_ZOOM,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            sectors: 24,
            stacks: 12,
            smooth: true,
        }
    }
}

impl CameraConfig {
    /// A camera placed and tuned as configured.
    pub fn build(&self) -> FlyCamera {
        FlyCamera::new(self.position)
            .with_orientation(self.yaw, self.pitch)
            .with_speed(self.speed)
            .with_sensitivity(self.sensitivity)
            .with_zoom(self.zoom)
    }
}

impl ViewerConfig {
    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load the file named by the first command-line argument, or use the
    /// defaults when there is none.
    pub fn from_args() -> Result<Self, ConfigError> {
        match std::env::args_os().nth(1) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                log::info!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}
