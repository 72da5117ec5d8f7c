//! # Mesh Buffer — Vertices Plus Triangle Indices
//!
//! [`MeshBuffer`] is what every generator in this module returns: an ordered
//! list of [`MeshVertex`] records and a list of `u32` indices grouped in
//! triples. Insertion order is generation order, and indices refer to those
//! positions, so a generator that pushes a vertex owns the number it gets
//! back.
//!
//! ## Smooth vs Flat
//!
//! Smooth surfaces share vertices between neighbouring triangles and call
//! [`push_vertex`](MeshBuffer::push_vertex) + [`push_triangle`](MeshBuffer::push_triangle).
//! Faceted surfaces call [`push_flat_triangle`](MeshBuffer::push_flat_triangle)
//! instead, which emits three fresh vertices carrying the face normal. Both
//! paths go through the same buffer, so every consumer (upload, wireframe,
//! statistics) sees one representation.

use std::collections::HashSet;

use glam::Vec3;

use super::UpAxis;
use super::vertex::MeshVertex;

/// Squared sine of the smallest corner angle that still yields a face
/// normal. Relative to edge lengths, so it holds at any mesh scale.
const DEGENERATE_SIN_SQ: f32 = 1e-12;

/// Interleaved vertex data and a CCW triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, vertex: MeshVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Append one triangle referencing existing vertices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert!(
            (a.max(b).max(c) as usize) < self.vertices.len(),
            "triangle ({a}, {b}, {c}) references a vertex that was never pushed"
        );
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Emit a triangle with its own three vertices and the face normal
    /// `normalize((b - a) × (c - a))`.
    ///
    /// The incoming normals are ignored unless the triangle has no area, in
    /// which case their average is used so the vertices stay shadable.
    pub fn push_flat_triangle(&mut self, a: MeshVertex, b: MeshVertex, c: MeshVertex) {
        let (pa, pb, pc) = (a.position(), b.position(), c.position());
        let (ab, ac) = (pb - pa, pc - pa);
        let cross = ab.cross(ac);
        let threshold = DEGENERATE_SIN_SQ * ab.length_squared() * ac.length_squared();
        let normal = Some(cross)
            .filter(|c| c.length_squared() > threshold)
            .and_then(Vec3::try_normalize)
            .unwrap_or_else(|| (a.normal() + b.normal() + c.normal()).normalize_or_zero());

        let base = self.vertices.len() as u32;
        for v in [a, b, c] {
            self.vertices.push(MeshVertex { normal: normal.to_array(), ..v });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex data as one flat run of `f32`, eight per vertex.
    pub fn interleaved_vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    /// Byte distance between consecutive vertices in
    /// [`interleaved_vertex_data`](Self::interleaved_vertex_data).
    pub fn interleaved_stride(&self) -> usize {
        MeshVertex::STRIDE
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Unique triangle edges as a line list, in first-seen order.
    ///
    /// Used to draw the mesh as a wireframe; an edge shared by two triangles
    /// appears once.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if seen.insert((a.min(b), a.max(b))) {
                    lines.extend_from_slice(&[a, b]);
                }
            }
        }
        lines
    }

    /// Rotate positions and normals from the Z-up generation frame onto
    /// `axis`. Winding is preserved because the mapping is a rotation.
    pub(crate) fn reorient(&mut self, axis: UpAxis) {
        if axis == UpAxis::Z {
            return;
        }
        for v in &mut self.vertices {
            v.position = axis.from_z_up(Vec3::from_array(v.position)).to_array();
            v.normal = axis.from_z_up(Vec3::from_array(v.normal)).to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex::new(Vec3::new(x, y, z), Vec3::Z, Vec2::ZERO)
    }

    #[test]
    fn push_vertex_returns_insertion_index() {
        let mut mesh = MeshBuffer::new();
        assert_eq!(mesh.push_vertex(vertex(0.0, 0.0, 0.0)), 0);
        assert_eq!(mesh.push_vertex(vertex(1.0, 0.0, 0.0)), 1);
        assert_eq!(mesh.push_vertex(vertex(0.0, 1.0, 0.0)), 2);
        mesh.push_triangle(0, 1, 2);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn flat_triangle_uses_face_normal() {
        let mut mesh = MeshBuffer::new();
        // CCW in the XY plane seen from +Z, incoming normals deliberately wrong.
        let mut a = vertex(0.0, 0.0, 0.0);
        a.normal = [1.0, 0.0, 0.0];
        mesh.push_flat_triangle(a, vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0));

        assert_eq!(mesh.indices(), &[0, 1, 2]);
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0], "face normal should be +Z");
        }
    }

    #[test]
    fn flat_triangle_keeps_positions_and_uvs() {
        let mut mesh = MeshBuffer::new();
        let a = MeshVertex::new(Vec3::ZERO, Vec3::Z, Vec2::new(0.1, 0.2));
        let b = MeshVertex::new(Vec3::X, Vec3::Z, Vec2::new(0.3, 0.4));
        let c = MeshVertex::new(Vec3::Y, Vec3::Z, Vec2::new(0.5, 0.6));
        mesh.push_flat_triangle(a, b, c);
        mesh.push_flat_triangle(a, b, c);

        assert_eq!(mesh.vertex_count(), 6, "flat triangles never share vertices");
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices()[4].uv, [0.3, 0.4]);
        assert_eq!(mesh.vertices()[5].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn degenerate_flat_triangle_falls_back_to_vertex_normals() {
        let mut mesh = MeshBuffer::new();
        let p = vertex(1.0, 1.0, 1.0);
        mesh.push_flat_triangle(p, p, p);
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn tiny_flat_triangle_still_uses_face_normal() {
        let mut mesh = MeshBuffer::new();
        let s = 1e-5;
        mesh.push_flat_triangle(vertex(0.0, 0.0, 0.0), vertex(0.0, s, 0.0), vertex(0.0, 0.0, s));
        for v in mesh.vertices() {
            assert!(
                (v.normal() - Vec3::X).length() < 1e-5,
                "small but real triangle must get its own normal, got {:?}",
                v.normal
            );
        }
    }

    #[test]
    fn collinear_flat_triangle_falls_back_to_vertex_normals() {
        let mut mesh = MeshBuffer::new();
        mesh.push_flat_triangle(vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0));
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn interleaved_data_is_eight_floats_per_vertex() {
        let mut mesh = MeshBuffer::new();
        mesh.push_vertex(vertex(1.0, 2.0, 3.0));
        mesh.push_vertex(vertex(4.0, 5.0, 6.0));

        let data = mesh.interleaved_vertex_data();
        assert_eq!(data.len(), 16);
        assert_eq!(&data[8..11], &[4.0, 5.0, 6.0]);
        assert_eq!(mesh.interleaved_stride(), 32);
        assert_eq!(mesh.vertex_bytes().len(), 64);
    }

    #[test]
    fn wireframe_deduplicates_shared_edges() {
        // Two triangles forming a quad share the diagonal 0-2.
        let mut mesh = MeshBuffer::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.push_vertex(vertex(x, y, 0.0));
        }
        mesh.push_triangle(0, 1, 2);
        mesh.push_triangle(0, 2, 3);

        let lines = mesh.wireframe_indices();
        assert_eq!(lines.len(), 10, "quad has 5 unique edges");
        assert_eq!(&lines[..6], &[0, 1, 1, 2, 2, 0]);
        assert_eq!(&lines[6..], &[2, 3, 3, 0]);
    }

    #[test]
    fn reorient_to_y_up_maps_z_onto_y() {
        let mut mesh = MeshBuffer::new();
        mesh.push_vertex(vertex(0.0, 0.0, 2.0));
        mesh.reorient(UpAxis::Y);

        let v = mesh.vertices()[0];
        assert_eq!(v.position, [0.0, 2.0, 0.0]);
        assert_eq!(v.normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn reorient_preserves_winding() {
        let mut mesh = MeshBuffer::new();
        mesh.push_flat_triangle(vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0));

        for axis in [UpAxis::X, UpAxis::Y] {
            let mut turned = mesh.clone();
            turned.reorient(axis);
            let v = turned.vertices();
            let face = (v[1].position() - v[0].position()).cross(v[2].position() - v[0].position());
            assert!(
                face.normalize().dot(v[0].normal()) > 0.999,
                "rotated face normal should still agree with winding for {axis:?}"
            );
        }
    }
}
