//! Fixed-topology shapes: the ground plane and the box.
//!
//! Neither has a detail parameter, so both come from small face tables
//! rather than a grid. Every face owns its four corners so that corners on a
//! shared edge can carry a different normal per face.

use glam::{Vec2, Vec3};

use super::{MeshBuffer, MeshVertex, ShapeError, check_dimension};

/// Corner offsets along a face's `(u, v)` tangents, CCW from outside, with
/// the texture coordinate of each corner.
const QUAD_CORNERS: [(Vec2, Vec2); 4] = [
    (Vec2::new(-1.0, -1.0), Vec2::new(0.0, 1.0)),
    (Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0)),
    (Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)),
    (Vec2::new(-1.0, 1.0), Vec2::new(0.0, 0.0)),
];

/// `(normal, u tangent, v tangent)` per cuboid face; `u × v = normal`.
const CUBOID_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Square on the XZ plane at `y = 0`, spanning `±half_extent`, normal +Y.
///
/// 4 vertices, 6 indices.
pub fn plane(half_extent: f32) -> Result<MeshBuffer, ShapeError> {
    check_dimension("half_extent", half_extent)?;

    let mut mesh = MeshBuffer::with_capacity(4, 6);
    push_quad(&mut mesh, Vec3::ZERO, Vec3::Y, Vec3::X * half_extent, Vec3::NEG_Z * half_extent);
    Ok(mesh)
}

/// Axis-aligned box centered at the origin.
///
/// 24 vertices (4 per face for correct normals) and 36 indices.
pub fn cuboid(half_extents: Vec3) -> Result<MeshBuffer, ShapeError> {
    check_dimension("half_extents.x", half_extents.x)?;
    check_dimension("half_extents.y", half_extents.y)?;
    check_dimension("half_extents.z", half_extents.z)?;

    let mut mesh = MeshBuffer::with_capacity(24, 36);
    for (normal, u, v) in CUBOID_FACES {
        push_quad(
            &mut mesh,
            normal * half_extents,
            normal,
            u * half_extents,
            v * half_extents,
        );
    }
    Ok(mesh)
}

/// Two CCW triangles spanning `center ± u ± v`.
fn push_quad(mesh: &mut MeshBuffer, center: Vec3, normal: Vec3, u: Vec3, v: Vec3) {
    let base = mesh.vertex_count() as u32;
    for (corner, uv) in QUAD_CORNERS {
        mesh.push_vertex(MeshVertex::new(center + u * corner.x + v * corner.y, normal, uv));
    }
    mesh.push_triangle(base, base + 1, base + 2);
    mesh.push_triangle(base, base + 2, base + 3);
}
