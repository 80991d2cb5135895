use glam::{Mat4, Vec3};

use super::transform::SceneObject;

/// Perspective camera placed by a world transform.
///
/// The view matrix is the inverse of `transform`, so the camera looks down its
/// local -Z axis with local +Y as up.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Mat4,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            transform: Mat4::IDENTITY,
            fov_y: 60f32.to_radians(),
            aspect: aspect_ratio(width, height).unwrap_or(1.0),
            z_near: 0.1,
            z_far: 1000.0,
        }
    }

    pub fn with_projection(mut self, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        self.fov_y = fov_y;
        self.z_near = z_near;
        self.z_far = z_far;
        self
    }

    /// Track the viewport size. Zero-area sizes keep the previous aspect.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if let Some(aspect) = aspect_ratio(width, height) {
            self.aspect = aspect;
        }
    }

    pub fn field_of_view(&self) -> f32 { self.fov_y }

    pub fn set_field_of_view(&mut self, fov_y: f32) { self.fov_y = fov_y; }

    /// Direction the camera looks at (local -Z in world space).
    pub fn forward(&self) -> Vec3 {
        -self.transform.z_axis.truncate().normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.transform.inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

impl SceneObject for Camera {
    fn transform(&self) -> Mat4 { self.transform }

    fn set_transform(&mut self, transform: Mat4) { self.transform = transform; }
}

// Minimised or collapsed windows report a zero width or height
fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(width as f32 / height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transform::Frame;

    #[test]
    fn test_view_is_inverse_of_transform() {
        let mut cam = Camera::new(800, 600);
        cam.translate(Vec3::new(1.0, 2.0, 3.0), Frame::Global);
        cam.rotate_y(0.4, Frame::Local);

        let product = cam.view_matrix() * cam.transform();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_forward_defaults_to_negative_z() {
        let cam = Camera::new(800, 600);
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_zero_area_resize_keeps_aspect() {
        let mut cam = Camera::new(800, 600);
        let aspect = 800.0 / 600.0;
        assert!((cam.aspect - aspect).abs() < 1e-6);

        cam.set_aspect(640, 0);
        assert_eq!(cam.aspect, aspect);
        cam.set_aspect(0, 480);
        assert_eq!(cam.aspect, aspect);
        assert!(cam.projection_matrix().is_finite());

        cam.set_aspect(1000, 500);
        assert!((cam.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_area_start_is_square() {
        let cam = Camera::new(0, 0);
        assert_eq!(cam.aspect, 1.0);
        assert!(cam.projection_matrix().is_finite());
    }

    #[test]
    fn test_projection_tracks_field_of_view() {
        let mut cam = Camera::new(800, 800);
        let narrow = cam.projection_matrix();
        cam.set_field_of_view(90f32.to_radians());
        let wide = cam.projection_matrix();

        // Wider fov means a smaller focal length on the y axis
        assert!(wide.y_axis.y < narrow.y_axis.y);
        assert!((wide.y_axis.y - 1.0).abs() < 1e-5);
    }
}
