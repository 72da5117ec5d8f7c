//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so callers don't need to
//! depend on it directly. [`Transform`] places an object in the scene as
//! translate · rotate · scale.

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Object placement: position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Self::IDENTITY
        }
    }

    /// Return a copy rotated `degrees` about `axis`.
    pub fn with_rotation_deg(mut self, axis: Vec3, degrees: f32) -> Self {
        self.rotation = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        self
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Model matrix, `T · R · S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Inverse transpose of the model matrix's linear part, padded to 4×4.
    ///
    /// Keeps normals perpendicular to surfaces under non-uniform scale.
    pub fn normal_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.matrix()).inverse().transpose())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
