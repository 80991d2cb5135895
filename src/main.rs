use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

// Import from the library crate
use camrig::{
    logging, Camera, ConfigError, FrameClock, InputState, NavigationController, Player, RigConfig, SceneObject,
};
use camrig::controller::input::{native, InputEvent};

#[derive(Parser, Debug)]
#[command(name = "camrig")]
#[command(about = "Free-fly / follow-player camera rig demo", long_about = None)]
struct Cli {
    /// TOML file overriding rig defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

struct App {
    window: Option<Arc<Window>>,
    nav: NavigationController,
    input: InputState,
    clock: FrameClock,
    cursor_grabbed: bool,
    frame_count: u64,
    size: (u32, u32),
}

impl App {
    fn new(config: &RigConfig, width: u32, height: u32) -> Result<Self, ConfigError> {
        let nav = NavigationController::new(Player::at(Vec3::ZERO), Camera::new(width, height), config)?;
        // The windowing layer writes scroll, the controller drains it
        let input = InputState::new().with_scroll(nav.scroll_accumulator());
        Ok(Self {
            window: None,
            nav,
            input,
            clock: FrameClock::new(),
            cursor_grabbed: false,
            frame_count: 0,
            size: (width, height),
        })
    }

    fn set_cursor_grab(&mut self, grab: bool) {
        let Some(window) = &self.window else { return };
        let mode = if grab { CursorGrabMode::Locked } else { CursorGrabMode::None };
        if let Err(e) = window.set_cursor_grab(mode) {
            // Some platforms only support confining, not locking
            let fallback = if grab { CursorGrabMode::Confined } else { CursorGrabMode::None };
            if let Err(e2) = window.set_cursor_grab(fallback) {
                tracing::warn!("cursor grab unavailable: {e}; {e2}");
                return;
            }
        }
        window.set_cursor_visible(!grab);
        self.cursor_grabbed = grab;
    }

    fn handle_input(&mut self, event: InputEvent) {
        let toggle_key = self.nav.bindings().toggle_mode;
        let release_key = self.nav.bindings().release_cursor;
        match event {
            InputEvent::KeyDown(key) if key == toggle_key => {
                // Key repeat delivers Pressed again while held; only toggle on the edge
                if !self.input.pressed_keys.contains(&key) {
                    self.nav.toggle_mode();
                    tracing::info!("navigation mode: {:?}", self.nav.mode());
                }
            }
            InputEvent::KeyDown(key) if key == release_key => {
                self.set_cursor_grab(false);
            }
            InputEvent::FocusLost => {
                self.set_cursor_grab(false);
            }
            _ => {}
        }
        self.input.process_event(&event);
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick();
        self.nav.update(&mut self.input, dt);

        self.frame_count += 1;
        if self.frame_count % 120 == 0 {
            let camera = self.nav.camera();
            tracing::debug!(
                "frame {}: mode {:?}, camera at {:?}, fov {:.1}°",
                self.frame_count,
                self.nav.mode(),
                camera.location(),
                camera.field_of_view().to_degrees()
            );
        }
        tracing::trace!("view_proj {:?}", self.nav.uniform().view_proj());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.clock.reset();
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("camrig")
            .with_inner_size(winit::dpi::PhysicalSize::new(self.size.0, self.size.1));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                self.nav.camera_mut().set_aspect(size.width, size.height);
                window.request_redraw();
                self.window = Some(Arc::new(window));
                self.clock.reset();
                tracing::info!("window created ({}x{}); click to capture the mouse", size.width, size.height);
            }
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                self.size = (size.width, size.height);
                self.nav.camera_mut().set_aspect(size.width, size.height);
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                if !self.cursor_grabbed {
                    self.set_cursor_grab(true);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                return;
            }
            _ => {}
        }
        if let Some(input) = native::window_event_to_input(&event) {
            self.handle_input(input);
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        // Look only while the cursor is captured
        if !self.cursor_grabbed {
            return;
        }
        if let Some(input) = native::device_event_to_input(&event) {
            self.input.process_event(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RigConfig::load(path)?,
        None => RigConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&config, cli.width, cli.height)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
