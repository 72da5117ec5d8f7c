//! # Lighting — Two-Light Phong
//!
//! The scene is lit by two point lights with a fixed Phong model evaluated
//! per fragment. Each light contributes:
//!
//! ```text
//! ambient  = ambient_strength · color
//! diffuse  = max(n · l, 0) · color
//! specular = specular_intensity · max(v · reflect(−l, n), 0)^highlight_size · color
//! light    = (ambient + diffuse + specular) · weight
//! ```
//!
//! and the fragment color is `Σ light × texel`. Point lights here have no
//! distance falloff; `weight` is the only way to dim one.
//!
//! The formula itself lives in the WGSL fragment shader; this module only
//! holds the values uploaded with each frame.

use crate::math::Vec3;

/// A point light: position, color, and a flat weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear RGB.
    pub color: Vec3,
    pub weight: f32,
}

impl PointLight {
    /// Bright white light above and in front of the table.
    pub fn key() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 2.0),
            color: Vec3::ONE,
            weight: 1.0,
        }
    }

    /// Warm, half-strength light below and behind the table.
    pub fn fill() -> Self {
        Self {
            position: Vec3::new(0.0, -1.0, -4.0),
            color: Vec3::new(1.0, 1.0, 0.8784),
            weight: 0.5,
        }
    }
}

/// Material-independent Phong constants shared by every lit surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    pub ambient_strength: f32,
    pub specular_intensity: f32,
    /// Specular exponent; larger means a tighter highlight.
    pub highlight_size: f32,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            ambient_strength: 0.1,
            specular_intensity: 0.1,
            highlight_size: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lights_match_the_desk_setup() {
        let key = PointLight::key();
        let fill = PointLight::fill();
        assert_eq!(key.weight, 1.0);
        assert_eq!(fill.weight, 0.5);
        assert_eq!(fill.color, Vec3::new(1.0, 1.0, 0.8784));
        assert_eq!(PhongParams::default().highlight_size, 16.0);
    }
}
