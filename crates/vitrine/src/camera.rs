//! # Fly Camera — Euler-Angle Free Look
//!
//! A first-person camera with no roll. Orientation is stored as two angles in
//! degrees, and the view basis is rebuilt from them after every change:
//!
//! ```text
//! front = normalize(cos(yaw)·cos(pitch), sin(pitch), sin(yaw)·cos(pitch))
//! right = normalize(front × world_up)
//! up    = normalize(right × front)
//! ```
//!
//! Yaw −90° looks down −Z, which with world up +Y matches the usual
//! right-handed "camera looks into the screen" convention.
//!
//! ## Constraints
//!
//! - **Pitch** is clamped to ±89°. At exactly ±90° `front` would be parallel
//!   to `world_up`, their cross product would vanish, and the basis would
//!   collapse.
//! - **Zoom** is the vertical field of view in degrees, clamped to
//!   `[1°, 45°]`. Scrolling narrows or widens it.
//!
//! Angles that leave the range are clamped in place and never reported; the
//! camera is always usable.
//!
//! ## Units
//!
//! Callers hand over raw quantities (seconds of key hold, cursor pixels,
//! scroll lines) and the camera scales them with its own speed and
//! sensitivity.

use crate::math::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Distance at which the orthographic view frames the same height as the
/// perspective view does.
const ORTHO_FOCUS_DISTANCE: f32 = 5.0;

/// Discrete movement directions, relative to the camera (forward, right) or
/// the world (up, down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// How view space is mapped to clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Free-fly camera state.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    position: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
    projection: Projection,
}

impl FlyCamera {
    /// Camera at `position` with default orientation and tuning.
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            projection: Projection::Perspective,
        };
        camera.update_vectors();
        camera
    }

    /// Set yaw and pitch in degrees. Pitch is clamped.
    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
        self
    }

    /// Movement speed in world units per second.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Degrees of rotation per cursor pixel.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Vertical field of view in degrees. Clamped.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self
    }

    /// Move along one direction for `delta_time` seconds.
    ///
    /// Forward/backward follow `front` (pitch included), left/right follow
    /// `right`, and up/down follow the world's vertical.
    pub fn process_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let axis = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.world_up,
            CameraMovement::Down => -self.world_up,
        };
        self.position += axis * velocity;
    }

    /// Turn by a cursor offset. Positive `x_offset` turns right, positive
    /// `y_offset` looks up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Zoom by a scroll offset. Scrolling up narrows the field of view.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Switch between perspective and orthographic projection.
    pub fn toggle_projection(&mut self) {
        self.projection = match self.projection {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        };
        log::info!("camera projection: {:?}", self.projection);
    }

    /// Right-handed look-at from `position` toward `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Clip-space projection with a 0..1 depth range.
    ///
    /// The orthographic volume is sized so that the zoom still controls how
    /// much of the scene is visible.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => Mat4::perspective_rh(self.zoom.to_radians(), aspect, near, far),
            Projection::Orthographic => {
                let half_height = (self.zoom.to_radians() / 2.0).tan() * ORTHO_FOCUS_DISTANCE;
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far)
            }
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(camera: &FlyCamera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        for (name, v) in [("front", f), ("right", r), ("up", u)] {
            assert!((v.length() - 1.0).abs() < 1e-4, "{name} has length {}", v.length());
        }
        assert!(f.dot(r).abs() < 1e-4, "front·right = {}", f.dot(r));
        assert!(f.dot(u).abs() < 1e-4, "front·up = {}", f.dot(u));
        assert!(r.dot(u).abs() < 1e-4, "right·up = {}", r.dot(u));
    }

    #[test]
    fn defaults_look_down_negative_z() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.zoom(), 45.0);
        assert!((camera.front() - Vec3::NEG_Z).length() < EPS, "front = {}", camera.front());
        assert!((camera.right() - Vec3::X).length() < EPS);
        assert!((camera.up() - Vec3::Y).length() < EPS);
    }

    #[test]
    fn view_matrix_matches_look_at() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 5.0));
        let expected = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 4.0), Vec3::Y);
        assert!(
            camera.view_matrix().abs_diff_eq(expected, EPS),
            "view {:?} != {:?}",
            camera.view_matrix(),
            expected
        );
    }

    #[test]
    fn basis_stays_orthonormal_under_random_mouse_input() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..1000 {
            let mut camera = FlyCamera::new(Vec3::ZERO);
            let steps = rng.random_range(1..20);
            for _ in 0..steps {
                let dx = rng.random_range(-2000.0..2000.0);
                let dy = rng.random_range(-2000.0..2000.0);
                camera.process_mouse_movement(dx, dy);
                assert_orthonormal(&camera);
            }
        }
    }

    #[test]
    fn pitch_is_pinned_at_limit() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        for _ in 0..10 {
            camera.process_mouse_movement(0.0, 10000.0);
        }
        assert_eq!(camera.pitch(), 89.0);
        assert_orthonormal(&camera);

        for _ in 0..10 {
            camera.process_mouse_movement(0.0, -10000.0);
        }
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
        camera.process_mouse_scroll(5.0);
        assert_eq!(camera.zoom(), 40.0);
    }

    #[test]
    fn movement_scales_with_speed_and_time() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_movement(CameraMovement::Forward, 0.5);
        assert!((camera.position() - Vec3::new(0.0, 0.0, -1.25)).length() < EPS);

        camera.process_movement(CameraMovement::Right, 0.4);
        assert!((camera.position() - Vec3::new(1.0, 0.0, -1.25)).length() < EPS);
    }

    #[test]
    fn vertical_movement_ignores_pitch() {
        let mut camera = FlyCamera::new(Vec3::ZERO).with_orientation(-90.0, 45.0);
        camera.process_movement(CameraMovement::Up, 1.0);
        assert!((camera.position() - Vec3::new(0.0, 2.5, 0.0)).length() < EPS);
        camera.process_movement(CameraMovement::Down, 2.0);
        assert!((camera.position() - Vec3::new(0.0, -2.5, 0.0)).length() < EPS);
    }

    #[test]
    fn opposite_moves_cancel() {
        let mut camera = FlyCamera::new(Vec3::ONE).with_orientation(30.0, -20.0);
        for (a, b) in [
            (CameraMovement::Forward, CameraMovement::Backward),
            (CameraMovement::Left, CameraMovement::Right),
            (CameraMovement::Up, CameraMovement::Down),
        ] {
            camera.process_movement(a, 0.3);
            camera.process_movement(b, 0.3);
        }
        assert!((camera.position() - Vec3::ONE).length() < EPS);
    }

    #[test]
    fn mouse_offset_uses_sensitivity() {
        let mut camera = FlyCamera::new(Vec3::ZERO).with_sensitivity(0.5);
        camera.process_mouse_movement(20.0, 10.0);
        assert_eq!(camera.yaw(), -80.0);
        assert_eq!(camera.pitch(), 5.0);
    }

    #[test]
    fn projection_toggles_and_depth_range_is_zero_to_one() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        for _ in 0..2 {
            let proj = camera.projection_matrix(16.0 / 9.0, 0.1, 100.0);
            let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
            let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
            assert!(near.z.abs() < 1e-4, "{:?}: near plane maps to {}", camera.projection(), near.z);
            assert!((far.z - 1.0).abs() < 1e-4, "{:?}: far plane maps to {}", camera.projection(), far.z);
            camera.toggle_projection();
        }
        assert_eq!(camera.projection(), Projection::Perspective);
    }

    #[test]
    fn builder_clamps_out_of_range_values() {
        let camera = FlyCamera::new(Vec3::ZERO).with_orientation(0.0, 120.0).with_zoom(90.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        assert_eq!(camera.zoom(), MAX_ZOOM);
        assert_orthonormal(&camera);
    }
}
