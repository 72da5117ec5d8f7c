//! # Uniforms — CPU Mirrors of the Shader's Buffers
//!
//! Each struct here is byte-for-byte what the WGSL side declares, so it can
//! be uploaded with a single `bytemuck::cast_slice`. WGSL aligns `vec3` to 16
//! bytes, which is why every `[f32; 3]` is followed by a scalar that fills
//! the slot.
//!
//! ```text
//! FrameUniform (160 bytes)                  group 0, once per frame
//!   view_proj        mat4x4   0..64
//!   view_position    vec3     64..76   + pad
//!   lights[2]        32 each  80..144
//!   ambient, specular, highlight  144..156  + pad
//!
//! MaterialUniform (16 bytes)                group 1, per surface
//!   texture_scale    vec2     0..8
//!   flags            u32      8..12    + pad
//!
//! ModelUniform (128 bytes)                  group 2, per object (dynamic)
//!   model            mat4x4   0..64
//!   normal_matrix    mat4x4   64..128
//! ```
//!
//! The normal matrix is stored as `mat4x4` even though only its upper 3×3 is
//! used; `mat3x3` columns are padded to 16 bytes anyway.

use bytemuck::{Pod, Zeroable};

use crate::lighting::{PhongParams, PointLight};
use crate::math::{Mat4, Vec3};
use crate::scene::{DrawItem, Surface};

/// Sample the overlay texture where its alpha is non-zero.
pub const MATERIAL_OVERLAY: u32 = 1;
/// Skip lighting and output flat white.
pub const MATERIAL_UNLIT: u32 = 2;

/// One point light, packed for GPU upload. 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLightData {
    pub position: [f32; 3],
    pub weight: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl From<&PointLight> for PointLightData {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.to_array(),
            weight: light.weight,
            color: light.color.to_array(),
            _pad: 0.0,
        }
    }
}

/// Everything that is constant across one frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    pub _pad0: f32,
    pub lights: [PointLightData; 2],
    pub ambient_strength: f32,
    pub specular_intensity: f32,
    pub highlight_size: f32,
    pub _pad1: f32,
}

impl FrameUniform {
    pub fn new(view_proj: Mat4, view_position: Vec3, lights: &[PointLight; 2], phong: &PhongParams) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view_position: view_position.to_array(),
            _pad0: 0.0,
            lights: [PointLightData::from(&lights[0]), PointLightData::from(&lights[1])],
            ambient_strength: phong.ambient_strength,
            specular_intensity: phong.specular_intensity,
            highlight_size: phong.highlight_size,
            _pad1: 0.0,
        }
    }
}

/// Per-surface parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub texture_scale: [f32; 2],
    pub flags: u32,
    pub _pad: u32,
}

impl From<&Surface> for MaterialUniform {
    fn from(surface: &Surface) -> Self {
        match surface {
            Surface::Textured { overlay, uv_scale, .. } => Self {
                texture_scale: uv_scale.to_array(),
                flags: if overlay.is_some() { MATERIAL_OVERLAY } else { 0 },
                _pad: 0,
            },
            Surface::Emissive => Self {
                texture_scale: [1.0, 1.0],
                flags: MATERIAL_UNLIT,
                _pad: 0,
            },
        }
    }
}

/// Per-object transform, written at an aligned offset of the dynamic buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl From<&DrawItem> for ModelUniform {
    fn from(item: &DrawItem) -> Self {
        Self {
            model: item.model.to_cols_array_2d(),
            normal_matrix: item.normal_matrix.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::scene::{MeshId, TextureId};

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<PointLightData>(), 32);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 160);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
    }

    #[test]
    fn frame_field_offsets_match_wgsl_layout() {
        assert_eq!(std::mem::offset_of!(FrameUniform, view_position), 64);
        assert_eq!(std::mem::offset_of!(FrameUniform, lights), 80);
        assert_eq!(std::mem::offset_of!(FrameUniform, ambient_strength), 144);
        assert_eq!(std::mem::offset_of!(PointLightData, color), 16);
    }

    #[test]
    fn frame_uniform_packs_lights_and_phong() {
        let lights = [PointLight::key(), PointLight::fill()];
        let frame = FrameUniform::new(Mat4::IDENTITY, Vec3::new(0.0, 0.0, 5.0), &lights, &PhongParams::default());
        assert_eq!(frame.view_position, [0.0, 0.0, 5.0]);
        assert_eq!(frame.lights[0].position, [0.0, 4.0, 2.0]);
        assert_eq!(frame.lights[1].weight, 0.5);
        assert_eq!(frame.highlight_size, 16.0);
    }

    #[test]
    fn material_flags_follow_surface() {
        let plain = MaterialUniform::from(&Surface::textured(TextureId(0)));
        let label = MaterialUniform::from(&Surface::with_overlay(TextureId(0), TextureId(1)));
        let emissive = MaterialUniform::from(&Surface::Emissive);
        assert_eq!(plain.flags, 0);
        assert_eq!(label.flags, MATERIAL_OVERLAY);
        assert_eq!(emissive.flags, MATERIAL_UNLIT);

        let scaled = Surface::Textured { base: TextureId(0), overlay: None, uv_scale: Vec2::new(2.0, 3.0) };
        assert_eq!(MaterialUniform::from(&scaled).texture_scale, [2.0, 3.0]);
    }

    #[test]
    fn model_uniform_is_column_major() {
        let item = DrawItem {
            mesh: MeshId(0),
            model: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            normal_matrix: Mat4::IDENTITY,
            surface: Surface::Emissive,
        };
        let uniform = ModelUniform::from(&item);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0], "translation lives in the last column");
    }
}
