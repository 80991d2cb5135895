use glam::{Mat4, Vec3};

use crate::config::{ConfigError, RigConfig};
use crate::controller::frame_loop::CameraUniform;
use crate::controller::input::{InputSource, KeyBindings, ScrollAccumulator};
use crate::model::{Camera, Frame, Player, SceneObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationMode {
    #[default]
    FreeFly,
    FollowPlayer,
}

impl NavigationMode {
    pub fn toggled(self) -> Self {
        match self {
            NavigationMode::FreeFly => NavigationMode::FollowPlayer,
            NavigationMode::FollowPlayer => NavigationMode::FreeFly,
        }
    }
}

/// Per-frame tuning, resolved from `RigConfig` once at construction
#[derive(Debug, Clone)]
struct Tuning {
    base_speed: f32,
    boost_speed: f32,
    mouse_sensitivity: f32,
    zoom_sensitivity: f32,
    zoom_min: f32,
    zoom_max: f32,
    follow_distance: f32,
}

impl From<&RigConfig> for Tuning {
    fn from(config: &RigConfig) -> Self {
        Self {
            base_speed: config.movement.base_speed,
            boost_speed: config.movement.boost_speed,
            mouse_sensitivity: config.look.mouse_sensitivity,
            zoom_sensitivity: config.zoom.sensitivity,
            zoom_min: config.zoom.min_degrees.to_radians(),
            zoom_max: config.zoom.max_degrees.to_radians(),
            follow_distance: config.follow.distance,
        }
    }
}

/// Drives a camera from player input in either free-fly or follow-player mode.
///
/// The controller owns its camera. Switching modes exchanges the camera pose
/// with the one saved at the previous switch, so flipping back and forth
/// restores where each mode left off.
pub struct NavigationController {
    camera: Camera,
    player: Player,
    mode: NavigationMode,
    last_camera_transform: Mat4,
    scroll: ScrollAccumulator,
    bindings: KeyBindings,
    tuning: Tuning,
    view_matrix: Mat4,
    proj_matrix: Mat4,
}

impl NavigationController {
    /// Bind a camera to `player`, placing it at the configured offset behind it.
    ///
    /// Fails when `config` does not pass `RigConfig::validate`.
    pub fn new(player: Player, camera: Camera, config: &RigConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let c = &config.camera;
        let mut camera = camera.with_projection(c.fov_degrees.to_radians(), c.z_near, c.z_far);
        let offset = Vec3::from(c.start_offset);
        camera.set_transform(Mat4::from_translation(player.location() + offset));

        let view_matrix = camera.view_matrix();
        let proj_matrix = camera.projection_matrix();
        tracing::debug!(
            "camera rig bound at {:?}, player at {:?}",
            camera.location(),
            player.location()
        );

        Ok(Self {
            last_camera_transform: camera.transform(),
            camera,
            player,
            mode: NavigationMode::default(),
            scroll: ScrollAccumulator::new(),
            bindings: config.keys.clone(),
            tuning: Tuning::from(config),
            view_matrix,
            proj_matrix,
        })
    }

    /// Handle to give to the windowing layer's scroll callback
    pub fn scroll_accumulator(&self) -> ScrollAccumulator {
        self.scroll.clone()
    }

    pub fn mode(&self) -> NavigationMode { self.mode }

    pub fn bindings(&self) -> &KeyBindings { &self.bindings }

    pub fn camera(&self) -> &Camera { &self.camera }

    pub fn camera_mut(&mut self) -> &mut Camera { &mut self.camera }

    pub fn player(&self) -> &Player { &self.player }

    pub fn player_mut(&mut self) -> &mut Player { &mut self.player }

    pub fn view_matrix(&self) -> Mat4 { self.view_matrix }

    pub fn proj_matrix(&self) -> Mat4 { self.proj_matrix }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view_matrix, self.proj_matrix)
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Switch to `mode`, exchanging camera poses if it differs from the current one
    pub fn set_mode(&mut self, mode: NavigationMode) {
        if mode == self.mode {
            return;
        }
        let current = self.camera.transform();
        self.camera.set_transform(self.last_camera_transform);
        self.last_camera_transform = current;
        self.mode = mode;
        tracing::debug!("navigation mode -> {:?}", mode);
    }

    /// Advance one frame: apply input to the camera, then derive view and projection.
    pub fn update<I: InputSource>(&mut self, input: &mut I, time_delta: f32) {
        // Both modes steer the underlying camera; follow mode only changes the view
        self.apply_movement(input, time_delta);
        self.apply_look(input);
        self.apply_zoom();

        self.view_matrix = match self.mode {
            NavigationMode::FollowPlayer => self.follow_view(),
            NavigationMode::FreeFly => self.camera.view_matrix(),
        };
        self.proj_matrix = self.camera.projection_matrix();
    }

    // Opposing keys are if/else-if: with both held the first-checked one wins.
    fn apply_movement<I: InputSource>(&mut self, input: &I, time_delta: f32) {
        let b = &self.bindings;
        let speed = if input.is_key_down(b.boost) { self.tuning.boost_speed } else { self.tuning.base_speed };
        let step = speed * time_delta;

        let transform = self.camera.transform();
        let back = transform.z_axis.truncate();
        let right = transform.x_axis.truncate();

        let mut delta = Vec3::ZERO;
        if input.is_key_down(b.forward) {
            delta -= back * step;
        } else if input.is_key_down(b.backward) {
            delta += back * step;
        }
        if input.is_key_down(b.left) {
            delta -= right * step;
        } else if input.is_key_down(b.right) {
            delta += right * step;
        }
        if input.is_key_down(b.up) {
            delta += Vec3::Y * step;
        } else if input.is_key_down(b.down) {
            delta -= Vec3::Y * step;
        }

        if delta != Vec3::ZERO {
            self.camera.translate(delta, Frame::Global);
        }
    }

    fn apply_look<I: InputSource>(&mut self, input: &mut I) {
        let cursor = input.cursor_position();
        input.reset_cursor();
        let sensitivity = self.tuning.mouse_sensitivity;

        if cursor.y != 0.0 {
            self.camera.rotate_x(-sensitivity * cursor.y, Frame::Local);
        }
        if cursor.x != 0.0 {
            // Global rotation pivots at the world origin; move there and back to spin in place
            let location = self.camera.location();
            self.camera.translate(-location, Frame::Global);
            self.camera.rotate_y(-sensitivity * cursor.x, Frame::Global);
            self.camera.translate(location, Frame::Global);
        }
    }

    // Clamps every frame: the fov may also be set directly through `camera_mut`
    fn apply_zoom(&mut self) {
        let scroll = self.scroll.take();
        let t = &self.tuning;
        let requested = self.camera.field_of_view() - t.zoom_sensitivity * scroll;
        let fov = requested.clamp(t.zoom_min, t.zoom_max);
        if fov != requested {
            tracing::trace!("field of view clamped to {:.1}°", fov.to_degrees());
        }
        self.camera.set_field_of_view(fov);
    }

    fn follow_view(&self) -> Mat4 {
        let target = self.player.location();
        let Some(dir) = (target - self.camera.location()).try_normalize() else {
            // Camera sits on the player: no trailing direction, keep the free view
            return self.camera.view_matrix();
        };
        let eye = target - dir * self.tuning.follow_distance;
        Mat4::look_at_rh(eye, target + Vec3::Y, Vec3::Y)
    }
}
