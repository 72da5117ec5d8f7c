//! # Texture — Image Files on the GPU
//!
//! Decodes every texture the scene lists with the `image` crate and uploads
//! it as `Rgba8UnormSrgb`. Images are flipped vertically on decode so that
//! `v = 0` samples the bottom row of the file; the mesh generators lay out
//! their UVs for that convention.
//!
//! ## The 1x1 White Default
//!
//! Entry 0 is always a single white pixel. A texture that fails to decode is
//! logged and replaced by it, so a missing file leaves an object lit but
//! untextured instead of stopping the viewer. It is also what objects
//! without an overlay bind in the overlay slot; the shader only reads that
//! slot when the overlay flag is set.

use std::path::{Path, PathBuf};

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::GpuContext;
use crate::scene::TextureId;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decode an image file into tightly packed RGBA8 rows, bottom row first.
pub fn decode_rgba8(path: &Path) -> Result<image::RgbaImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rgba = image.to_rgba8();
    image::imageops::flip_vertical_in_place(&mut rgba);
    Ok(rgba)
}

/// Internal entry for a loaded GPU texture.
struct TextureEntry {
    view: wgpu::TextureView,
}

/// All scene textures plus the white default.
pub struct TextureStore {
    entries: Vec<TextureEntry>,
}

impl TextureStore {
    /// Upload the white default, then every path in order. `TextureId(i)`
    /// maps to entry `i + 1`.
    pub fn new(gpu: &GpuContext, paths: &[PathBuf]) -> Self {
        let mut store = Self {
            entries: Vec::with_capacity(paths.len() + 1),
        };
        store.upload_rgba8(gpu, "white 1x1", 1, 1, &[255u8, 255, 255, 255]);

        for path in paths {
            match decode_rgba8(path) {
                Ok(image) => {
                    let (width, height) = image.dimensions();
                    log::debug!("texture {}: {width}x{height}", path.display());
                    store.upload_rgba8(gpu, &path.to_string_lossy(), width, height, image.as_raw());
                }
                Err(e) => {
                    log::warn!("{e}; using white instead");
                    store.entries.push(TextureEntry {
                        view: store.entries[0].view.clone(),
                    });
                }
            }
        }
        log::info!("loaded {} textures", paths.len());
        store
    }

    /// The view for a scene texture, or the white default for `None`.
    pub fn view(&self, id: Option<TextureId>) -> &wgpu::TextureView {
        let index = id.map_or(0, |id| id.0 + 1);
        self.entries
            .get(index)
            .map_or(&self.entries[0].view, |entry| &entry.view)
    }

    /// Upload a texture from raw RGBA8 data.
    fn upload_rgba8(&mut self, gpu: &GpuContext, label: &str, width: u32, height: u32, data: &[u8]) {
        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.entries.push(TextureEntry { view });
    }
}
