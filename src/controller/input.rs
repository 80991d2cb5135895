/// Platform-agnostic input handling for the camera rig
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Physical keys the rig reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    LeftShift,
    Tab,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Key::W),
            "KeyA" => Some(Key::A),
            "KeyS" => Some(Key::S),
            "KeyD" => Some(Key::D),
            "KeyQ" => Some(Key::Q),
            "KeyE" => Some(Key::E),
            "ShiftLeft" => Some(Key::LeftShift),
            "Tab" => Some(Key::Tab),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseMove { dx: f32, dy: f32 },
    MouseWheel { delta_y: f32 },
    FocusLost,
}

/// What the navigation controller reads from the windowing layer each frame
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;

    /// Cursor displacement from the origin since the last reset
    fn cursor_position(&self) -> Vec2;

    fn reset_cursor(&mut self);
}

/// Scroll delta summed between frames.
///
/// Clones share the same counter, so one handle can live in the windowing
/// callback while the controller drains another.
#[derive(Debug, Clone, Default)]
pub struct ScrollAccumulator(Rc<Cell<f32>>);

impl ScrollAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, delta_y: f32) {
        self.0.set(self.0.get() + delta_y);
    }

    pub fn peek(&self) -> f32 {
        self.0.get()
    }

    /// Return the summed delta and reset to zero
    pub fn take(&self) -> f32 {
        self.0.replace(0.0)
    }
}

/// Held keys plus cursor displacement, fed by `InputEvent`s
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<Key>,
    cursor: Vec2,
    scroll: Option<ScrollAccumulator>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward wheel events into `scroll`
    pub fn with_scroll(mut self, scroll: ScrollAccumulator) -> Self {
        self.scroll = Some(scroll);
        self
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(*key);
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key);
            }
            InputEvent::MouseMove { dx, dy } => {
                self.cursor += Vec2::new(*dx, *dy);
            }
            InputEvent::MouseWheel { delta_y } => {
                if let Some(scroll) = &self.scroll {
                    scroll.push(*delta_y);
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
        }
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

impl InputSource for InputState {
    fn is_key_down(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn cursor_position(&self) -> Vec2 {
        self.cursor
    }

    fn reset_cursor(&mut self) {
        self.cursor = Vec2::ZERO;
    }
}

/// Key mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub boost: Key,
    pub toggle_mode: Key,
    pub release_cursor: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Q,
            down: Key::E,
            boost: Key::LeftShift,
            toggle_mode: Key::Tab,
            release_cursor: Key::Escape,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;
    use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
    use winit::keyboard::{KeyCode, PhysicalKey};

    // Pixel-precise touchpads report in pixels; treat one line as this many
    const PIXELS_PER_LINE: f64 = 20.0;

    pub fn keycode_to_key(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::KeyQ => Some(Key::Q),
            KeyCode::KeyE => Some(Key::E),
            KeyCode::ShiftLeft => Some(Key::LeftShift),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }

    pub fn key_state_to_input(code: KeyCode, state: ElementState) -> Option<InputEvent> {
        let key = keycode_to_key(code)?;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown(key),
            ElementState::Released => InputEvent::KeyUp(key),
        })
    }

    pub fn scroll_to_input(delta: &MouseScrollDelta) -> InputEvent {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        InputEvent::MouseWheel { delta_y }
    }

    pub fn window_event_to_input(event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => key_state_to_input(code, event.state),
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::MouseWheel { delta, .. } => Some(scroll_to_input(delta)),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        }
    }

    /// Raw mouse motion; unaffected by cursor grabbing or window edges
    pub fn device_event_to_input(event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::MouseMotion { delta } => Some(InputEvent::MouseMove {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            }),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent, WheelEvent};

    // DOM_DELTA_PIXEL wheels report ~100 px per notch
    const PIXELS_PER_NOTCH: f64 = 100.0;

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> Option<InputEvent> {
        let key = Key::from_code(&e.code())?;
        Some(if is_down { InputEvent::KeyDown(key) } else { InputEvent::KeyUp(key) })
    }

    pub fn mouse_move_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseMove {
            dx: e.movement_x() as f32,
            dy: e.movement_y() as f32,
        }
    }

    pub fn wheel_event_to_input(e: &WheelEvent) -> InputEvent {
        let delta_y = match e.delta_mode() {
            WheelEvent::DOM_DELTA_PIXEL => e.delta_y() / PIXELS_PER_NOTCH,
            _ => e.delta_y(),
        };
        // DOM wheel is positive when scrolling down, opposite to winit/GLFW
        InputEvent::MouseWheel { delta_y: -delta_y as f32 }
    }
}
