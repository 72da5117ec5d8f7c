//! # Vertex — Interleaved Per-Corner Data
//!
//! Every mesh the tessellator produces is a flat array of [`MeshVertex`]
//! records. Each record carries a position, a surface normal, and a texture
//! coordinate, stored back to back so the GPU can fetch one vertex with a
//! single strided read.
//!
//! ## Memory Layout
//!
//! ```text
//! MeshVertex (32 bytes)
//! ┌──────────────┬──────────────┬──────────────┐
//! │ position     │ normal       │ uv           │
//! │ [f32; 3]     │ [f32; 3]     │ [f32; 2]     │
//! │ 12 bytes     │ 12 bytes     │ 8 bytes      │
//! │ offset 0     │ offset 12    │ offset 24    │
//! │ location(0)  │ location(1)  │ location(2)  │
//! └──────────────┴──────────────┴──────────────┘
//! ```
//!
//! The field order is part of the upload contract. [`MeshVertex::LAYOUT`]
//! binds three attributes at fixed byte offsets; reordering the struct or
//! dropping a field silently breaks every pipeline that consumes it.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Number of `f32` values in one interleaved record (3 + 3 + 2).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Byte offset of the position attribute.
pub const POSITION_OFFSET: u64 = 0;
/// Byte offset of the normal attribute.
pub const NORMAL_OFFSET: u64 = 12;
/// Byte offset of the texture coordinate attribute.
pub const UV_OFFSET: u64 = 24;

/// Per-vertex data for 3D meshes: position, surface normal, and texture UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Size of one interleaved record in bytes.
    pub const STRIDE: usize = std::mem::size_of::<MeshVertex>();

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: Self::STRIDE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec3<f32>
            wgpu::VertexAttribute {
                offset: POSITION_OFFSET,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal: vec3<f32>
            wgpu::VertexAttribute {
                offset: NORMAL_OFFSET,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv: vec2<f32>
            wgpu::VertexAttribute {
                offset: UV_OFFSET,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_eight_floats() {
        assert_eq!(MeshVertex::STRIDE, 32);
        assert_eq!(MeshVertex::STRIDE, FLOATS_PER_VERTEX * std::mem::size_of::<f32>());
    }

    #[test]
    fn field_offsets_match_layout() {
        assert_eq!(std::mem::offset_of!(MeshVertex, position) as u64, POSITION_OFFSET);
        assert_eq!(std::mem::offset_of!(MeshVertex, normal) as u64, NORMAL_OFFSET);
        assert_eq!(std::mem::offset_of!(MeshVertex, uv) as u64, UV_OFFSET);

        let offsets: Vec<u64> = MeshVertex::LAYOUT.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }

    #[test]
    fn casts_to_interleaved_floats() {
        let v = MeshVertex::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec2::new(0.25, 0.75),
        );
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.25, 0.75]);
    }
}
