// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;

// MVC Architecture
pub mod model;
pub mod controller;

pub use config::{ConfigError, RigConfig};
pub use controller::{CameraUniform, FrameClock, InputState, NavigationController, NavigationMode};
pub use model::{Camera, Frame, Player, SceneObject};

#[cfg(target_arch = "wasm32")]
pub use web::WebRig;

#[cfg(target_arch = "wasm32")]
mod web {
    use glam::{Mat4, Vec3};
    use wasm_bindgen::prelude::wasm_bindgen;
    use wasm_bindgen::JsValue;
    use web_sys::{KeyboardEvent, MouseEvent, WheelEvent};

    use crate::controller::input::{wasm, InputEvent, InputSource, InputState, ScrollAccumulator};
    use crate::{logging, Camera, NavigationController, NavigationMode, Player, RigConfig, SceneObject};

    #[wasm_bindgen(start)]
    pub fn start() {
        logging::init();
    }

    /// Camera rig driven from page event listeners.
    ///
    /// The page owns the render loop: forward DOM events here, call `update`
    /// once per animation frame, then upload `view_matrix`/`proj_matrix`.
    #[wasm_bindgen]
    pub struct WebRig {
        nav: NavigationController,
        input: InputState,
        scroll: ScrollAccumulator,
    }

    #[wasm_bindgen]
    impl WebRig {
        /// `config_toml` may be empty for defaults.
        #[wasm_bindgen(constructor)]
        pub fn new(width: u32, height: u32, config_toml: &str) -> Result<WebRig, JsValue> {
            let config = RigConfig::from_toml_str(config_toml).map_err(|e| js_error(e.to_string()))?;
            let nav = NavigationController::new(Player::default(), Camera::new(width, height), &config)
                .map_err(|e| js_error(e.to_string()))?;
            let scroll = nav.scroll_accumulator();
            let input = InputState::new().with_scroll(scroll.clone());
            tracing::info!("web camera rig ready ({width}x{height})");
            Ok(WebRig { nav, input, scroll })
        }

        /// Returns true when the event was consumed (caller should `preventDefault`)
        pub fn handle_key(&mut self, e: &KeyboardEvent, is_down: bool) -> bool {
            let Some(event) = wasm::keyboard_event_to_input(e, is_down) else {
                return false;
            };
            if is_down && !e.repeat() && event == InputEvent::KeyDown(self.nav.bindings().toggle_mode) {
                self.nav.toggle_mode();
            }
            self.input.process_event(&event);
            true
        }

        pub fn handle_mouse_move(&mut self, e: &MouseEvent) {
            self.input.process_event(&wasm::mouse_move_to_input(e));
        }

        pub fn handle_wheel(&mut self, e: &WheelEvent) {
            self.input.process_event(&wasm::wheel_event_to_input(e));
        }

        pub fn focus_lost(&mut self) {
            self.input.process_event(&InputEvent::FocusLost);
            self.input.reset_cursor();
        }

        pub fn resize(&mut self, width: u32, height: u32) {
            self.nav.camera_mut().set_aspect(width, height);
        }

        pub fn set_player_position(&mut self, x: f32, y: f32, z: f32) {
            self.nav.player_mut().set_transform(Mat4::from_translation(Vec3::new(x, y, z)));
        }

        /// `dt` in seconds; non-finite or negative samples are treated as zero
        pub fn update(&mut self, dt: f32) {
            let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            self.nav.update(&mut self.input, dt);
        }

        pub fn toggle_mode(&mut self) {
            self.nav.toggle_mode();
        }

        pub fn follows_player(&self) -> bool {
            self.nav.mode() == NavigationMode::FollowPlayer
        }

        pub fn pending_scroll(&self) -> f32 {
            self.scroll.peek()
        }

        pub fn view_matrix(&self) -> js_sys::Float32Array {
            js_sys::Float32Array::from(&self.nav.view_matrix().to_cols_array()[..])
        }

        pub fn proj_matrix(&self) -> js_sys::Float32Array {
            js_sys::Float32Array::from(&self.nav.proj_matrix().to_cols_array()[..])
        }
    }

    fn js_error(msg: impl Into<String>) -> JsValue {
        JsValue::from_str(&msg.into())
    }
}
