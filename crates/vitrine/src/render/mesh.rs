//! # Mesh — GPU Mesh Storage
//!
//! Uploads each [`SceneMesh`](crate::scene::SceneMesh) into GPU buffers once
//! at startup. Objects refer to meshes by [`MeshId`], which is the same index
//! here as in the scene, so no handle translation is needed.
//!
//! ## GpuMesh
//!
//! Each uploaded mesh becomes a [`GpuMesh`]: one vertex buffer and two index
//! buffers. The triangle list drives normal rendering; the line list built
//! from [`MeshBuffer::wireframe_indices`] drives wireframe mode. Buffers are
//! released when the store is dropped.

use wgpu::util::DeviceExt;

use super::GpuContext;
use crate::mesh::MeshBuffer;
use crate::scene::{MeshId, SceneMesh};

/// A mesh that has been uploaded to GPU buffers.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub line_buffer: wgpu::Buffer,
    pub line_count: u32,
}

impl GpuMesh {
    pub fn upload(gpu: &GpuContext, mesh: &MeshBuffer) -> Self {
        let vertex_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertex buffer"),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh index buffer"),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });
        let lines = mesh.wireframe_indices();
        let line_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh line buffer"),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
            line_buffer,
            line_count: lines.len() as u32,
        }
    }
}

/// Every mesh of the scene, uploaded. Meshes without triangles (a sphere
/// with one stack) have no slot, since wgpu cannot bind an empty buffer.
pub struct MeshStore {
    meshes: Vec<Option<GpuMesh>>,
}

impl MeshStore {
    pub fn new(gpu: &GpuContext, meshes: &[SceneMesh]) -> Self {
        let meshes: Vec<Option<GpuMesh>> = meshes
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if is_drawable(&m.buffer) {
                    Some(GpuMesh::upload(gpu, &m.buffer))
                } else {
                    log::warn!("mesh {i} ({}) has no triangles, skipping upload", m.desc.kind());
                    None
                }
            })
            .collect();
        let bytes: u64 = meshes
            .iter()
            .flatten()
            .map(|m| m.vertex_buffer.size() + m.index_buffer.size() + m.line_buffer.size())
            .sum();
        log::info!("uploaded {} meshes ({} KiB)", meshes.iter().flatten().count(), bytes / 1024);
        Self { meshes }
    }

    /// The uploaded mesh, or `None` when it was empty.
    pub fn get(&self, id: MeshId) -> Option<&GpuMesh> {
        self.meshes.get(id.0).and_then(Option::as_ref)
    }
}

/// Whether a mesh has anything to draw. Empty index buffers cannot be sliced.
pub(crate) fn is_drawable(mesh: &MeshBuffer) -> bool {
    !mesh.is_empty() && !mesh.vertices().is_empty()
}
