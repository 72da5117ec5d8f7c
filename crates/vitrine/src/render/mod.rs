//! Rendering subsystem — wgpu forward renderer for the scene.

pub(crate) mod draw;
pub mod gpu;
pub(crate) mod mesh;
pub(crate) mod pass;
pub(crate) mod pipeline;
pub mod texture;
pub mod uniforms;

pub use draw::Renderer;
pub use gpu::{GpuContext, GpuError};
pub use pass::ClearColor;
pub use texture::{decode_rgba8, TextureError};
