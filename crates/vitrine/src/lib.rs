//! # Vitrine — Desk Still-Life Viewer
//!
//! Procedurally tessellated spheres, cylinders and cones arranged on a desk,
//! lit by two Phong point lights and explored with a fly camera. Rendering
//! uses wgpu on a winit window.
//!
//! The geometry side ([`mesh`], [`camera`], [`scene`]) has no GPU dependency
//! and can be used headless; [`app::run`] opens the viewer.

pub mod app;
pub mod camera;
pub mod config;
pub mod input;
pub mod lighting;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod time;

pub use app::{run, AppError};
pub use camera::{CameraMovement, FlyCamera, Projection};
pub use config::{ConfigError, ViewerConfig};
pub use mesh::{CylinderDesc, MeshBuffer, MeshVertex, ShapeDesc, ShapeError, SphereDesc, UpAxis};
pub use scene::Scene;
