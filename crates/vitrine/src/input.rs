//! Keyboard and mouse input state.
//!
//! The [`Input`] set tracks which keys are currently pressed, just pressed
//! this frame, or just released this frame. [`KeyBindings`] turns held keys
//! into camera movements, and [`CursorTracker`] turns absolute cursor
//! positions into look offsets.
//!
//! Updated by the window event handler each frame.

use std::collections::HashSet;
use std::hash::Hash;

use winit::dpi::PhysicalPosition;
use winit::event::MouseScrollDelta;
pub use winit::keyboard::KeyCode;

use crate::camera::CameraMovement;

/// Pixels of touchpad scroll that count as one wheel line.
pub const PIXELS_PER_LINE: f32 = 20.0;

/// Tracks the state of a set of inputs (keys or mouse buttons).
///
/// - `pressed`: currently held down
/// - `just_pressed`: pressed this frame (not held last frame)
/// - `just_released`: released this frame
#[derive(Debug)]
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
    just_released: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Returns `true` if the input was pressed this frame.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    /// Returns `true` if the input was released this frame.
    pub fn just_released(&self, input: T) -> bool {
        self.just_released.contains(&input)
    }

    /// Call when an input is pressed (from event handler). Key repeat does
    /// not count as a fresh press.
    pub(crate) fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    /// Call when an input is released (from event handler).
    pub(crate) fn release(&mut self, input: T) {
        if self.pressed.remove(&input) {
            self.just_released.insert(input);
        }
    }

    /// Clear per-frame state. Called at the end of each frame.
    pub(crate) fn clear_just(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which key drives which action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub movement: Vec<(KeyCode, CameraMovement)>,
    pub toggle_projection: KeyCode,
    pub toggle_wireframe: KeyCode,
    pub exit: KeyCode,
}

impl KeyBindings {
    /// Movements whose key is held this frame, in binding order.
    pub fn held_movements<'a>(&'a self, keys: &'a Input<KeyCode>) -> impl Iterator<Item = CameraMovement> + 'a {
        self.movement
            .iter()
            .filter(|(key, _)| keys.pressed(*key))
            .map(|&(_, movement)| movement)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            movement: vec![
                (KeyCode::KeyW, CameraMovement::Forward),
                (KeyCode::KeyS, CameraMovement::Backward),
                (KeyCode::KeyA, CameraMovement::Left),
                (KeyCode::KeyD, CameraMovement::Right),
                (KeyCode::KeyQ, CameraMovement::Up),
                (KeyCode::KeyE, CameraMovement::Down),
            ],
            toggle_projection: KeyCode::KeyP,
            toggle_wireframe: KeyCode::KeyF,
            exit: KeyCode::Escape,
        }
    }
}

/// Converts absolute cursor positions into look offsets.
///
/// The first sample only records a position, so the camera does not jump
/// when the cursor enters the window. Y is flipped because window
/// coordinates grow downward while pitch grows upward.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    last: Option<(f32, f32)>,
}

impl CursorTracker {
    /// Record a new position and return `(x_offset, y_offset)` since the
    /// previous one.
    pub fn offset(&mut self, position: PhysicalPosition<f64>) -> Option<(f32, f32)> {
        let (x, y) = (position.x as f32, position.y as f32);
        let offset = self.last.map(|(last_x, last_y)| (x - last_x, last_y - y));
        self.last = Some((x, y));
        offset
    }

    /// Forget the last position, e.g. when the cursor leaves the window.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Vertical scroll amount in wheel lines.
pub fn scroll_amount(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}
