//! # Cylinder — Frustum Tessellation With Caps
//!
//! One generator covers cylinders, truncated cones, and cones: the radius is
//! interpolated linearly from `base_radius` at `z = -h/2` to `top_radius` at
//! `z = +h/2`.
//!
//! ## Index Groups
//!
//! The index buffer is laid out in three contiguous groups so a caller can
//! draw, or inspect, each part separately:
//!
//! ```text
//! ┌──────────────────────┬───────────────┬───────────────┐
//! │ side                 │ base          │ top           │
//! │ stacks × sectors × 2 │ disk cap, or  │ disk cap, or  │
//! │ (minus apex rows)    │ apex fan      │ apex fan      │
//! └──────────────────────┴───────────────┴───────────────┘
//! ```
//!
//! A disk cap is a fan from a center vertex over its own ring of rim
//! vertices. The rim is duplicated from the side ring because a cap vertex
//! needs the flat axis normal while the side vertex needs the slanted one.
//!
//! ## Cone Apex
//!
//! When an end has radius zero its side ring collapses to a point, and the
//! quads touching it degenerate into one real triangle plus one with no area.
//! The zero-area triangle is never emitted, and the real ones form the apex
//! fan stored in that end's group. The collapsed ring still holds
//! `sectors + 1` apex vertices, so each fan triangle keeps its own seam UV and
//! slanted normal.
//!
//! ## Slant Normal
//!
//! A side normal tilts toward the narrow end by `α = atan2(base − top, h)`:
//!
//! ```text
//! n = (cos θ · cos α, sin θ · cos α, sin α)
//! ```
//!
//! That is the normalized gradient of `sqrt(x² + y²) − r(z)`, i.e. the exact
//! surface normal of the frustum, so cylinders get `α = 0` and horizontal
//! normals.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::{Vec2, Vec3};

use super::{MeshBuffer, MeshVertex, ShapeError, UpAxis, check_counts, check_dimension};

/// Parameters for a cylinder or cone centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderDesc {
    pub base_radius: f32,
    pub top_radius: f32,
    pub height: f32,
    pub sector_count: u32,
    pub stack_count: u32,
    /// Shared side normals when true, per-face side normals when false.
    pub smooth: bool,
    pub up_axis: UpAxis,
}

impl CylinderDesc {
    /// Smooth, Z-up cylinder.
    pub fn new(base_radius: f32, top_radius: f32, height: f32, sector_count: u32, stack_count: u32) -> Self {
        Self {
            base_radius,
            top_radius,
            height,
            sector_count,
            stack_count,
            smooth: true,
            up_axis: UpAxis::Z,
        }
    }

    pub fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// True when either end closes to a point.
    pub fn is_cone(&self) -> bool {
        self.base_radius == 0.0 || self.top_radius == 0.0
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        check_counts(self.sector_count, self.stack_count)?;
        check_dimension("base_radius", self.base_radius)?;
        check_dimension("top_radius", self.top_radius)?;
        check_dimension("height", self.height)?;
        if self.height == 0.0 {
            return Err(ShapeError::ZeroHeight);
        }
        if self.base_radius == 0.0 && self.top_radius == 0.0 {
            return Err(ShapeError::DegenerateCylinder);
        }
        Ok(())
    }

    /// Validate and tessellate.
    pub fn build(&self) -> Result<Cylinder, ShapeError> {
        self.validate()?;

        let ring = unit_circle(self.sector_count);
        let grid = self.side_grid(&ring);
        let rows = self.side_triangles();

        let mut mesh = MeshBuffer::new();
        if self.smooth {
            for v in &grid {
                mesh.push_vertex(*v);
            }
        }

        let side = self.emit_group(&mut mesh, |m| emit_side(m, &grid, &rows.side, self.smooth));
        let base = self.emit_group(&mut mesh, |m| {
            if self.base_radius > 0.0 {
                push_cap(m, &ring, self.base_radius, -self.height / 2.0, CapEnd::Base);
            } else {
                emit_side(m, &grid, &rows.base_apex, self.smooth);
            }
        });
        let top = self.emit_group(&mut mesh, |m| {
            if self.top_radius > 0.0 {
                push_cap(m, &ring, self.top_radius, self.height / 2.0, CapEnd::Top);
            } else {
                emit_side(m, &grid, &rows.top_apex, self.smooth);
            }
        });
        mesh.reorient(self.up_axis);

        log::debug!(
            "cylinder r={}..{} h={} {}x{} smooth={}: {} vertices, {} indices",
            self.base_radius,
            self.top_radius,
            self.height,
            self.sector_count,
            self.stack_count,
            self.smooth,
            mesh.vertex_count(),
            mesh.index_count()
        );

        Ok(Cylinder { desc: *self, mesh, side, base, top })
    }

    /// Slant angle of the side wall, zero for a straight cylinder.
    pub fn slant_angle(&self) -> f32 {
        (self.base_radius - self.top_radius).atan2(self.height)
    }

    fn emit_group(&self, mesh: &mut MeshBuffer, emit: impl FnOnce(&mut MeshBuffer)) -> Range<u32> {
        let start = mesh.index_count() as u32;
        emit(mesh);
        start..mesh.index_count() as u32
    }

    /// Side vertices, `(stacks + 1) × (sectors + 1)`, bottom ring first.
    fn side_grid(&self, ring: &[(f32, f32)]) -> Vec<MeshVertex> {
        let (sectors, stacks) = (self.sector_count, self.stack_count);
        let (sin_a, cos_a) = self.slant_angle().sin_cos();

        let mut grid = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
        for i in 0..=stacks {
            let t = i as f32 / stacks as f32;
            let z = -self.height / 2.0 + t * self.height;
            let radius = self.base_radius + t * (self.top_radius - self.base_radius);

            for (j, &(cos, sin)) in ring.iter().enumerate() {
                let position = Vec3::new(cos * radius, sin * radius, z);
                let normal = Vec3::new(cos * cos_a, sin * cos_a, sin_a);
                let uv = Vec2::new(j as f32 / sectors as f32, 1.0 - t);
                grid.push(MeshVertex::new(position, normal, uv));
            }
        }
        grid
    }

    /// Side quads split into triangles, with the rows touching a collapsed
    /// ring moved into that end's apex fan.
    fn side_triangles(&self) -> SideTriangles {
        let (sectors, stacks) = (self.sector_count, self.stack_count);
        let base_apex = self.base_radius == 0.0;
        let top_apex = self.top_radius == 0.0;

        let mut rows = SideTriangles::default();
        for i in 0..stacks {
            let mut k1 = i * (sectors + 1);
            let mut k2 = k1 + sectors + 1;
            for _ in 0..sectors {
                let lower = [k1, k1 + 1, k2];
                let upper = [k2, k1 + 1, k2 + 1];
                if top_apex && i == stacks - 1 {
                    rows.top_apex.push(lower);
                } else if base_apex && i == 0 {
                    rows.base_apex.push(upper);
                } else {
                    rows.side.push(lower);
                    rows.side.push(upper);
                }
                k1 += 1;
                k2 += 1;
            }
        }
        rows
    }
}

#[derive(Default)]
struct SideTriangles {
    side: Vec<[u32; 3]>,
    base_apex: Vec<[u32; 3]>,
    top_apex: Vec<[u32; 3]>,
}

#[derive(Clone, Copy, PartialEq)]
enum CapEnd {
    Base,
    Top,
}

/// `(cos θ, sin θ)` for `θ = 2π·j/sectors`, `j` in `0..=sectors`.
fn unit_circle(sectors: u32) -> Vec<(f32, f32)> {
    let step = TAU / sectors as f32;
    (0..=sectors)
        .map(|j| {
            let (sin, cos) = (j as f32 * step).sin_cos();
            (cos, sin)
        })
        .collect()
}

fn emit_side(mesh: &mut MeshBuffer, grid: &[MeshVertex], triangles: &[[u32; 3]], smooth: bool) {
    for &[a, b, c] in triangles {
        if smooth {
            mesh.push_triangle(a, b, c);
        } else {
            mesh.push_flat_triangle(grid[a as usize], grid[b as usize], grid[c as usize]);
        }
    }
}

/// Disk fan: one center vertex, `sectors` rim vertices, `sectors` triangles.
fn push_cap(mesh: &mut MeshBuffer, ring: &[(f32, f32)], radius: f32, z: f32, end: CapEnd) {
    let sectors = (ring.len() - 1) as u32;
    let normal = match end {
        CapEnd::Base => Vec3::NEG_Z,
        CapEnd::Top => Vec3::Z,
    };

    let center = mesh.push_vertex(MeshVertex::new(Vec3::new(0.0, 0.0, z), normal, Vec2::splat(0.5)));
    for &(cos, sin) in &ring[..sectors as usize] {
        // Base is mirrored in U so the texture reads correctly from below.
        let u = match end {
            CapEnd::Base => -cos * 0.5 + 0.5,
            CapEnd::Top => cos * 0.5 + 0.5,
        };
        let uv = Vec2::new(u, -sin * 0.5 + 0.5);
        mesh.push_vertex(MeshVertex::new(Vec3::new(cos * radius, sin * radius, z), normal, uv));
    }

    for j in 0..sectors {
        let k = center + 1 + j;
        let next = center + 1 + (j + 1) % sectors;
        match end {
            CapEnd::Base => mesh.push_triangle(center, next, k),
            CapEnd::Top => mesh.push_triangle(center, k, next),
        }
    }
}

/// A generated cylinder with the index ranges of its side, base, and top.
#[derive(Debug, Clone)]
pub struct Cylinder {
    desc: CylinderDesc,
    mesh: MeshBuffer,
    side: Range<u32>,
    base: Range<u32>,
    top: Range<u32>,
}

impl Cylinder {
    pub fn desc(&self) -> &CylinderDesc {
        &self.desc
    }

    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    pub fn into_mesh(self) -> MeshBuffer {
        self.mesh
    }

    pub fn side_indices(&self) -> Range<u32> {
        self.side.clone()
    }

    /// Base cap, or the apex fan when `base_radius` is zero.
    pub fn base_indices(&self) -> Range<u32> {
        self.base.clone()
    }

    /// Top cap, or the apex fan when `top_radius` is zero.
    pub fn top_indices(&self) -> Range<u32> {
        self.top.clone()
    }

    /// The slice of the index buffer covered by `range`.
    pub fn group(&self, range: Range<u32>) -> &[u32] {
        &self.mesh.indices()[range.start as usize..range.end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn cylinder(base: f32, top: f32, height: f32, sectors: u32, stacks: u32) -> Cylinder {
        CylinderDesc::new(base, top, height, sectors, stacks)
            .build()
            .expect("valid cylinder parameters")
    }

    fn side_vertices(c: &Cylinder) -> &[MeshVertex] {
        let d = c.desc();
        let n = ((d.stack_count + 1) * (d.sector_count + 1)) as usize;
        &c.mesh().vertices()[..n]
    }

    #[test]
    fn closed_cylinder_counts() {
        let c = cylinder(1.0, 1.0, 2.0, 24, 1);
        // 2 side rings of 25, plus two caps of 1 center + 24 rim.
        assert_eq!(c.mesh().vertex_count(), 50 + 25 + 25);
        assert_eq!(c.side_indices().len(), 24 * 6);
        assert_eq!(c.base_indices().len(), 24 * 3);
        assert_eq!(c.top_indices().len(), 24 * 3);
        assert_eq!(c.mesh().index_count(), 288);
    }

    #[test]
    fn groups_are_contiguous_and_ordered() {
        let c = cylinder(0.5, 0.25, 1.0, 12, 3);
        assert_eq!(c.side_indices().start, 0);
        assert_eq!(c.side_indices().end, c.base_indices().start);
        assert_eq!(c.base_indices().end, c.top_indices().start);
        assert_eq!(c.top_indices().end as usize, c.mesh().index_count());
    }

    #[test]
    fn indices_are_triangles_within_range() {
        for (base, top) in [(1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.7, 0.2)] {
            for smooth in [true, false] {
                let c = CylinderDesc::new(base, top, 1.5, 9, 4).smooth(smooth).build().unwrap();
                let mesh = c.mesh();
                assert_eq!(mesh.index_count() % 3, 0);
                for &idx in mesh.indices() {
                    assert!((idx as usize) < mesh.vertex_count(), "index {idx} out of range");
                }
            }
        }
    }

    #[test]
    fn straight_cylinder_side_normals_are_horizontal() {
        let c = cylinder(0.5, 0.5, 2.0, 24, 4);
        for v in side_vertices(&c) {
            assert!(v.normal[2].abs() < EPS, "side normal {:?} has z component", v.normal);
            assert!((v.normal().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn cone_top_is_apex_fan() {
        let c = cylinder(0.04, 0.0, 0.1, 24, 1);
        let top = c.group(c.top_indices());
        assert_eq!(top.len() / 3, 24, "top group should hold one triangle per sector");

        let verts = c.mesh().vertices();
        let apex = Vec3::new(0.0, 0.0, 0.05);
        for tri in top.chunks_exact(3) {
            let touching = tri
                .iter()
                .filter(|&&i| (verts[i as usize].position() - apex).length() < EPS)
                .count();
            assert_eq!(touching, 1, "fan triangle {tri:?} should have exactly one apex corner");
        }
        // A cone keeps its base disk.
        assert_eq!(c.base_indices().len(), 24 * 3);
    }

    #[test]
    fn inverted_cone_base_is_apex_fan() {
        let c = cylinder(0.0, 1.0, 1.0, 16, 3);
        assert_eq!(c.base_indices().len() / 3, 16);
        assert_eq!(c.top_indices().len() / 3, 16);
        assert_eq!(c.side_indices().len(), 16 * 2 * 6);
    }

    #[test]
    fn apex_fan_has_no_degenerate_triangles() {
        for smooth in [true, false] {
            let c = CylinderDesc::new(1.0, 0.0, 2.0, 12, 2).smooth(smooth).build().unwrap();
            let verts = c.mesh().vertices();
            for tri in c.mesh().indices().chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| verts[i as usize].position());
                assert!((b - a).cross(c - a).length() > 1e-6, "triangle {tri:?} has no area");
            }
        }
    }

    #[test]
    fn single_stack_flat_cone_is_all_apex_fan() {
        let c = CylinderDesc::new(1.0, 0.0, 2.0, 8, 1).smooth(false).build().unwrap();
        assert!(c.side_indices().is_empty(), "the only row closes on the apex");
        assert_eq!(c.base_indices().len(), 8 * 3, "base disk");
        assert_eq!(c.top_indices().len(), 8 * 3, "apex fan");
        assert_eq!(c.mesh().vertex_count(), 9 + 8 * 3, "cap center + rim, then three per fan face");

        let verts = c.mesh().vertices();
        for tri in c.group(c.top_indices()).chunks_exact(3) {
            let [a, b, d] = [tri[0], tri[1], tri[2]].map(|i| verts[i as usize]);
            let face = (b.position() - a.position()).cross(d.position() - a.position());
            assert!(face.length() > 1e-6, "fan triangle {tri:?} has no area");
            let n = a.normal();
            assert!(n.dot(face.normalize()) > 0.9999, "flat normal must be the face normal");
            assert!(n.z > 0.0, "cone faces tilt toward the apex");
        }
    }

    #[test]
    fn slant_normal_is_perpendicular_to_the_wall() {
        let c = cylinder(1.0, 0.25, 1.5, 16, 2);
        let d = *c.desc();
        let grid = side_vertices(&c);
        let ring = (d.sector_count + 1) as usize;
        for j in 0..ring {
            let bottom = grid[j].position();
            let top = grid[2 * ring + j].position();
            let along_wall = (top - bottom).normalize();
            let n = grid[j].normal();
            assert!(n.dot(along_wall).abs() < EPS, "normal {n} not perpendicular to the wall");
            assert!(n.z > 0.0, "narrowing frustum normals tilt upward");
            assert!(n.truncate().dot(bottom.truncate()) > 0.0, "normal points outward");
        }
    }

    #[test]
    fn cap_normals_and_uvs() {
        let c = cylinder(1.0, 1.0, 2.0, 8, 1);
        let verts = c.mesh().vertices();
        let cap_start = 18;
        let base = &verts[cap_start..cap_start + 9];
        let top = &verts[cap_start + 9..cap_start + 18];
        for v in base {
            assert_eq!(v.normal, [0.0, 0.0, -1.0]);
            assert_eq!(v.position[2], -1.0);
        }
        for v in top {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.position[2], 1.0);
        }
        assert_eq!(base[0].uv, [0.5, 0.5]);
        // Rim vertex at θ = 0: base mirrors U, top does not.
        assert!((base[1].uv[0] - 0.0).abs() < EPS);
        assert!((top[1].uv[0] - 1.0).abs() < EPS);
    }

    #[test]
    fn caps_wind_outward() {
        let c = cylinder(1.0, 1.0, 2.0, 10, 1);
        let verts = c.mesh().vertices();
        for (range, expected) in [(c.base_indices(), -1.0), (c.top_indices(), 1.0)] {
            for tri in c.group(range).chunks_exact(3) {
                let [a, b, cc] = [tri[0], tri[1], tri[2]].map(|i| verts[i as usize].position());
                let face = (b - a).cross(cc - a);
                assert!(face.z * expected > 0.0, "cap triangle {tri:?} is wound the wrong way");
            }
        }
    }

    #[test]
    fn side_winds_outward() {
        let c = cylinder(0.8, 0.3, 1.0, 12, 3);
        let verts = c.mesh().vertices();
        for tri in c.group(c.side_indices()).chunks_exact(3) {
            let [a, b, cc] = [tri[0], tri[1], tri[2]].map(|i| verts[i as usize].position());
            let face = (b - a).cross(cc - a);
            let centroid = (a + b + cc) / 3.0;
            assert!(face.truncate().dot(centroid.truncate()) > 0.0, "side triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn side_uvs_run_top_to_bottom() {
        let c = cylinder(1.0, 1.0, 1.0, 4, 2);
        let grid = side_vertices(&c);
        assert_eq!(grid[0].uv, [0.0, 1.0], "bottom ring starts at V = 1");
        assert_eq!(grid[grid.len() - 1].uv, [1.0, 0.0], "top ring ends at V = 0");
    }

    #[test]
    fn flat_cylinder_keeps_caps_and_duplicates_side() {
        let smooth = cylinder(1.0, 1.0, 2.0, 12, 2);
        let flat = CylinderDesc::new(1.0, 1.0, 2.0, 12, 2).smooth(false).build().unwrap();
        assert_eq!(flat.mesh().index_count(), smooth.mesh().index_count());
        assert_eq!(flat.side_indices(), smooth.side_indices());
        let side_tris = flat.side_indices().len();
        assert_eq!(flat.mesh().vertex_count(), side_tris + 2 * (12 + 1));
    }

    #[test]
    fn x_up_cylinder_extends_along_x() {
        let c = CylinderDesc::new(0.5, 0.5, 3.0, 8, 1).up_axis(UpAxis::X).build().unwrap();
        for v in c.mesh().vertices() {
            assert!(v.position[0].abs() <= 1.5 + EPS);
            assert!(v.position[1].hypot(v.position[2]) <= 0.5 + EPS);
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(CylinderDesc::new(1.0, 1.0, 1.0, 2, 1).build().unwrap_err(), ShapeError::TooFewSectors(2));
        assert_eq!(CylinderDesc::new(1.0, 1.0, 1.0, 3, 0).build().unwrap_err(), ShapeError::TooFewStacks(0));
        assert_eq!(CylinderDesc::new(1.0, 1.0, 0.0, 8, 1).build().unwrap_err(), ShapeError::ZeroHeight);
        assert_eq!(CylinderDesc::new(0.0, 0.0, 1.0, 8, 1).build().unwrap_err(), ShapeError::DegenerateCylinder);
        assert!(matches!(
            CylinderDesc::new(1.0, -0.1, 1.0, 8, 1).build().unwrap_err(),
            ShapeError::InvalidDimension { name: "top_radius", .. }
        ));
    }
}
