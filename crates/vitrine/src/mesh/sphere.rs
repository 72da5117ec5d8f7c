//! # Sphere — Latitude/Longitude Tessellation
//!
//! A UV sphere is a grid wrapped around a ball. Stacks slice it by latitude
//! from the north pole (+Z) to the south pole, sectors slice it by longitude
//! around the pole axis.
//!
//! ```text
//!   stack 0  ●───●───●───●      ← north pole, every column meets here
//!            │ ╲ │ ╲ │ ╲ │        (one triangle per quad)
//!   stack 1  ●───●───●───●
//!            │ ╲ │ ╲ │ ╲ │        (two triangles per quad)
//!   stack 2  ●───●───●───●
//!            │ ╲ │ ╲ │ ╲ │        (one triangle per quad)
//!   stack 3  ●───●───●───●      ← south pole
//!         sector 0       sector N (= sector 0 in space, U = 1)
//! ```
//!
//! Every grid row has `sectors + 1` vertices: the last column sits on top of
//! the first but carries `U = 1`, so the texture wraps without a visible
//! seam. The pole rows likewise hold `sectors + 1` copies of the pole point
//! with distinct `U` values.
//!
//! For each quad `k1 = stack·(sectors+1) + sector` (upper-left) and
//! `k2 = k1 + sectors + 1` (lower-left), two triangles `(k1, k2, k1+1)` and
//! `(k1+1, k2, k2+1)` are emitted, except that the first is dropped on the
//! top stack and the second on the bottom stack; there the quad collapses into
//! a single triangle touching the pole.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};

use super::{MeshBuffer, MeshVertex, ShapeError, UpAxis, check_counts, check_dimension};

/// Parameters for a UV sphere centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereDesc {
    pub radius: f32,
    pub sector_count: u32,
    pub stack_count: u32,
    /// Shared per-vertex normals when true, one normal per face when false.
    pub smooth: bool,
    pub up_axis: UpAxis,
}

impl SphereDesc {
    /// Smooth, Z-up sphere.
    pub fn new(radius: f32, sector_count: u32, stack_count: u32) -> Self {
        Self {
            radius,
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

    pub fn validate(&self) -> Result<(), ShapeError> {
        check_counts(self.sector_count, self.stack_count)?;
        check_dimension("radius", self.radius)?;
        if self.radius == 0.0 {
            return Err(ShapeError::ZeroRadius);
        }
        Ok(())
    }

    /// Validate and tessellate.
    pub fn build(&self) -> Result<Sphere, ShapeError> {
        self.validate()?;

        let grid = self.grid();
        let triangles = grid_triangles(self.sector_count, self.stack_count);

        let mut mesh = if self.smooth {
            let mut mesh = MeshBuffer::with_capacity(grid.len(), triangles.len() * 3);
            for v in &grid {
                mesh.push_vertex(*v);
            }
            for [a, b, c] in &triangles {
                mesh.push_triangle(*a, *b, *c);
            }
            mesh
        } else {
            let mut mesh = MeshBuffer::with_capacity(triangles.len() * 3, triangles.len() * 3);
            for [a, b, c] in &triangles {
                mesh.push_flat_triangle(grid[*a as usize], grid[*b as usize], grid[*c as usize]);
            }
            mesh
        };
        mesh.reorient(self.up_axis);

        log::debug!(
            "sphere r={} {}x{} smooth={}: {} vertices, {} indices",
            self.radius,
            self.sector_count,
            self.stack_count,
            self.smooth,
            mesh.vertex_count(),
            mesh.index_count()
        );

        Ok(Sphere { desc: *self, mesh })
    }

    /// Index count of the tessellation, identical for smooth and flat.
    pub fn expected_index_count(&self) -> usize {
        let (sectors, stacks) = (self.sector_count as usize, self.stack_count as usize);
        sectors * stacks * 6 - sectors * 6
    }

    /// The shared-vertex grid, `(stacks + 1) × (sectors + 1)` vertices.
    fn grid(&self) -> Vec<MeshVertex> {
        let (sectors, stacks) = (self.sector_count, self.stack_count);
        let sector_step = TAU / sectors as f32;
        let stack_step = PI / stacks as f32;

        let mut grid = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
        for i in 0..=stacks {
            // From +π/2 at the north pole down to -π/2.
            let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
            let xy = self.radius * stack_angle.cos();
            let z = self.radius * stack_angle.sin();

            for j in 0..=sectors {
                let sector_angle = j as f32 * sector_step;
                let position = Vec3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);
                let uv = Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32);
                grid.push(MeshVertex::new(position, position / self.radius, uv));
            }
        }
        grid
    }
}

/// Triangle corners into the vertex grid, pole rows reduced to one
/// triangle per quad.
fn grid_triangles(sectors: u32, stacks: u32) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity((sectors * stacks * 2) as usize);
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;
        for _ in 0..sectors {
            if i != 0 {
                triangles.push([k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                triangles.push([k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }
    triangles
}

/// A generated sphere together with the parameters that produced it.
#[derive(Debug, Clone)]
pub struct Sphere {
    desc: SphereDesc,
    mesh: MeshBuffer,
}

impl Sphere {
    pub fn desc(&self) -> &SphereDesc {
        &self.desc
    }

    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    pub fn into_mesh(self) -> MeshBuffer {
        self.mesh
    }
}
