//! # Mesh — Procedural Surface Tessellation
//!
//! Everything in the scene is generated on the CPU at startup: spheres and
//! cylinders (including cones) from stack/sector grids, plus a ground plane
//! and a cuboid from fixed vertex tables. Each generator fills a
//! [`MeshBuffer`] of interleaved [`MeshVertex`] records and a CCW triangle
//! index list.
//!
//! ## Coordinate Frame
//!
//! Curved shapes are generated with their pole/height axis along +Z and then
//! rotated onto the requested [`UpAxis`]. The rotation is proper (determinant
//! +1), so winding and outward normals survive it.
//!
//! ## Validation
//!
//! Every descriptor is checked before any geometry exists. A bad sector count
//! or a negative radius is a [`ShapeError`], never a silent clamp.
//!
//! ```text
//! SphereDesc / CylinderDesc / ShapeDesc
//!        │ build()
//!        ▼
//!  validate ──Err──▶ ShapeError
//!        │ Ok
//!        ▼
//!  generate (Z-up) ──▶ reorient(up_axis) ──▶ MeshBuffer
//! ```

pub mod buffer;
pub mod cylinder;
pub mod shapes;
pub mod sphere;
pub mod vertex;

pub use buffer::MeshBuffer;
pub use cylinder::{Cylinder, CylinderDesc};
pub use sphere::{Sphere, SphereDesc};
pub use vertex::MeshVertex;

use glam::Vec3;
use thiserror::Error;

/// Fewest sectors that still enclose an area.
pub const MIN_SECTORS: u32 = 3;
/// Fewest stacks a grid can have.
pub const MIN_STACKS: u32 = 1;

/// Invalid shape parameters, reported before generation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("sector count {0} is below the minimum of 3")]
    TooFewSectors(u32),
    #[error("stack count {0} is below the minimum of 1")]
    TooFewStacks(u32),
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("sphere radius must be greater than zero")]
    ZeroRadius,
    #[error("cylinder height must be greater than zero")]
    ZeroHeight,
    #[error("cylinder base and top radius cannot both be zero")]
    DegenerateCylinder,
}

/// Axis the pole (sphere) or height (cylinder) of a shape points along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpAxis {
    X,
    Y,
    #[default]
    Z,
}

impl UpAxis {
    /// Map a vector from the Z-up generation frame onto this axis.
    pub fn from_z_up(self, v: Vec3) -> Vec3 {
        match self {
            // Rotation of +90° about Y.
            UpAxis::X => Vec3::new(v.z, v.y, -v.x),
            // Rotation of -90° about X.
            UpAxis::Y => Vec3::new(v.x, v.z, -v.y),
            UpAxis::Z => v,
        }
    }
}

/// Any mesh the scene can ask for. Two equal descriptors produce identical
/// buffers, which is how the scene shares meshes between objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDesc {
    Sphere(SphereDesc),
    Cylinder(CylinderDesc),
    /// Square on the XZ plane, normal +Y.
    Plane { half_extent: f32 },
    /// Axis-aligned box centered at the origin.
    Cuboid { half_extents: Vec3 },
}

impl ShapeDesc {
    /// Validate and generate the mesh.
    pub fn build(&self) -> Result<MeshBuffer, ShapeError> {
        match self {
            ShapeDesc::Sphere(desc) => Ok(desc.build()?.into_mesh()),
            ShapeDesc::Cylinder(desc) => Ok(desc.build()?.into_mesh()),
            ShapeDesc::Plane { half_extent } => shapes::plane(*half_extent),
            ShapeDesc::Cuboid { half_extents } => shapes::cuboid(*half_extents),
        }
    }

    /// Short human-readable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeDesc::Sphere(_) => "sphere",
            ShapeDesc::Cylinder(desc) if desc.is_cone() => "cone",
            ShapeDesc::Cylinder(_) => "cylinder",
            ShapeDesc::Plane { .. } => "plane",
            ShapeDesc::Cuboid { .. } => "cuboid",
        }
    }
}

impl From<SphereDesc> for ShapeDesc {
    fn from(desc: SphereDesc) -> Self {
        ShapeDesc::Sphere(desc)
    }
}

impl From<CylinderDesc> for ShapeDesc {
    fn from(desc: CylinderDesc) -> Self {
        ShapeDesc::Cylinder(desc)
    }
}

pub(crate) fn check_counts(sector_count: u32, stack_count: u32) -> Result<(), ShapeError> {
    if sector_count < MIN_SECTORS {
        return Err(ShapeError::TooFewSectors(sector_count));
    }
    if stack_count < MIN_STACKS {
        return Err(ShapeError::TooFewStacks(stack_count));
    }
    Ok(())
}

pub(crate) fn check_dimension(name: &'static str, value: f32) -> Result<(), ShapeError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ShapeError::InvalidDimension { name, value });
    }
    Ok(())
}
