//! Window and event loop via winit.
//!
//! [`App`] implements [`ApplicationHandler`]: it creates the window and
//! [`Renderer`] on `resumed`, feeds keyboard, cursor and scroll events into
//! the camera, and draws a frame on every `RedrawRequested`.
//!
//! Errors raised inside the event loop cannot be returned through winit, so
//! they are stored, the loop is asked to exit, and [`run`] returns them.

use std::sync::Arc;

use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::config::{ConfigError, ViewerConfig};
use crate::input::{scroll_amount, CursorTracker, Input, KeyBindings};
use crate::mesh::ShapeError;
use crate::render::{GpuError, Renderer};
use crate::scene::Scene;
use crate::time::FrameClock;

/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 600;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build scene: {0}")]
    Shape(#[from] ShapeError),
}

/// What the frame's input asked for beyond camera motion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameActions {
    pub exit: bool,
    pub toggle_wireframe: bool,
}

/// Apply this frame's held and just-pressed keys to the scene camera.
pub(crate) fn apply_keys(scene: &mut Scene, keys: &Input<KeyCode>, bindings: &KeyBindings, dt: f32) -> FrameActions {
    let camera = scene.camera_mut();
    for movement in bindings.held_movements(keys) {
        camera.process_movement(movement, dt);
    }
    if keys.just_pressed(bindings.toggle_projection) {
        camera.toggle_projection();
    }
    FrameActions {
        exit: keys.just_pressed(bindings.exit),
        toggle_wireframe: keys.just_pressed(bindings.toggle_wireframe),
    }
}

/// The application state that winit drives.
pub struct App {
    config: ViewerConfig,
    scene: Scene,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    keys: Input<KeyCode>,
    bindings: KeyBindings,
    cursor: CursorTracker,
    clock: FrameClock,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: ViewerConfig, scene: Scene) -> Self {
        Self {
            config,
            scene,
            window: None,
            renderer: None,
            keys: Input::new(),
            bindings: KeyBindings::default(),
            cursor: CursorTracker::default(),
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        // Mouse look: keep the cursor inside the window and hide it.
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(false);

        let renderer = Renderer::new(window.clone(), &self.scene, &self.config)?;
        window.request_redraw();
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.clock.tick();
        let actions = apply_keys(&mut self.scene, &self.keys, &self.bindings, self.clock.delta_secs());
        self.keys.clear_just();

        if actions.exit {
            log::info!("exit key pressed");
            event_loop.exit();
            return;
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if actions.toggle_wireframe {
            renderer.toggle_wireframe();
        }

        match renderer.render(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                renderer.recover_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("surface error: {e:?}");
            }
        }

        if self.clock.frame_count() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", self.clock.fps());
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.keys.press(key_code),
                        ElementState::Released => self.keys.release(key_code),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some((x, y)) = self.cursor.offset(position) {
                    self.scene.camera_mut().process_mouse_movement(x, y);
                }
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.cursor.reset();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scene.camera_mut().process_mouse_scroll(scroll_amount(delta));
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

/// Build the desk scene and run the viewer until the window closes.
pub fn run(config: ViewerConfig) -> Result<(), AppError> {
    let scene = Scene::desk(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scene);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{FlyCamera, Projection};
    use crate::math::Vec3;

    fn scene() -> Scene {
        Scene::new(FlyCamera::new(Vec3::new(0.0, 0.0, 5.0)))
    }

    #[test]
    fn held_w_moves_the_camera_forward() {
        let mut scene = scene();
        let mut keys = Input::new();
        keys.press(KeyCode::KeyW);

        let actions = apply_keys(&mut scene, &keys, &KeyBindings::default(), 1.0);
        assert_eq!(actions, FrameActions::default());
        let position = scene.camera().position();
        assert!((position - Vec3::new(0.0, 0.0, 2.5)).length() < 1e-5, "got {position}");
    }

    #[test]
    fn toggles_fire_only_on_the_press_frame() {
        let mut scene = scene();
        let bindings = KeyBindings::default();
        let mut keys = Input::new();
        keys.press(KeyCode::KeyP);
        keys.press(KeyCode::KeyF);

        let actions = apply_keys(&mut scene, &keys, &bindings, 0.016);
        assert!(actions.toggle_wireframe);
        assert_eq!(scene.camera().projection(), Projection::Orthographic);

        keys.clear_just();
        let actions = apply_keys(&mut scene, &keys, &bindings, 0.016);
        assert!(!actions.toggle_wireframe, "held key does not toggle again");
        assert_eq!(scene.camera().projection(), Projection::Orthographic);
    }

    #[test]
    fn escape_requests_exit() {
        let mut scene = scene();
        let mut keys = Input::new();
        keys.press(KeyCode::Escape);
        assert!(apply_keys(&mut scene, &keys, &KeyBindings::default(), 0.0).exit);
    }
}
