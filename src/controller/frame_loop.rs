use std::time::Instant;

use glam::Mat4;

/// View and projection as uploaded to a uniform buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, proj: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.proj) * Mat4::from_cols_array_2d(&self.view)
    }
}

/// Produces per-frame time steps for `NavigationController::update`.
///
/// Steps are clamped so a stalled frame (window drag, breakpoint) does not
/// fling the camera across the scene.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    max_delta: f32,
}

impl FrameClock {
    pub const DEFAULT_MAX_DELTA: f32 = 0.1;

    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_tick: start,
            max_delta: Self::DEFAULT_MAX_DELTA,
        }
    }

    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Seconds since the previous tick, in `[0, max_delta]`
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = self.last_tick.max(now);
        elapsed.as_secs_f32().clamp(0.0, self.max_delta)
    }

    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::time::Duration;

    #[test]
    fn test_tick_reports_elapsed_seconds() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);

        let dt = clock.tick_at(start + Duration::from_millis(40));
        assert!((dt - 0.024).abs() < 1e-6);
    }

    #[test]
    fn test_tick_clamps_stalls() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start).with_max_delta(0.05);
        assert_eq!(clock.tick_at(start + Duration::from_secs(3)), 0.05);
    }

    #[test]
    fn test_tick_never_negative() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start - Duration::from_millis(500)), 0.0);
        // An out-of-order sample must not rewind the clock
        let dt = clock.tick_at(start + Duration::from_millis(10));
        assert!((dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_is_gpu_layout() {
        let view = Mat4::from_translation(Vec3::new(0.0, -2.0, -6.0));
        let proj = Mat4::perspective_rh_gl(1.0, 1.5, 0.1, 100.0);
        let uniform = CameraUniform::new(view, proj);

        assert_eq!(bytemuck::bytes_of(&uniform).len(), 128);
        assert_eq!(uniform.view[3], [0.0, -2.0, -6.0, 1.0]);
        assert!(uniform.view_proj().abs_diff_eq(proj * view, 1e-6));
    }
}
