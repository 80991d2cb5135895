use glam::{Mat4, Vec3};

/// Frame an incremental transform is composed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Post-multiply (`M * X`): axes are the object's own axes.
    Local,
    /// Pre-multiply (`X * M`): axes are world axes, pivoting at the world origin.
    Global,
}

impl Frame {
    fn compose(self, transform: Mat4, delta: Mat4) -> Mat4 {
        match self {
            Frame::Local => transform * delta,
            Frame::Global => delta * transform,
        }
    }
}

/// Anything placed in the scene by an affine transform.
///
/// Implementors only provide storage; the incremental operations are shared.
pub trait SceneObject {
    fn transform(&self) -> Mat4;
    fn set_transform(&mut self, transform: Mat4);

    /// World-space position (translation column).
    fn location(&self) -> Vec3 {
        self.transform().w_axis.truncate()
    }

    fn translate(&mut self, delta: Vec3, frame: Frame) {
        let m = frame.compose(self.transform(), Mat4::from_translation(delta));
        self.set_transform(m);
    }

    fn rotate_x(&mut self, angle: f32, frame: Frame) {
        let m = frame.compose(self.transform(), Mat4::from_rotation_x(angle));
        self.set_transform(m);
    }

    fn rotate_y(&mut self, angle: f32, frame: Frame) {
        let m = frame.compose(self.transform(), Mat4::from_rotation_y(angle));
        self.set_transform(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(Mat4);

    impl SceneObject for Dummy {
        fn transform(&self) -> Mat4 { self.0 }
        fn set_transform(&mut self, transform: Mat4) { self.0 = transform; }
    }

    #[test]
    fn test_local_translation_follows_orientation() {
        let mut p = Dummy(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        p.translate(Vec3::new(0.0, 0.0, -1.0), Frame::Local);

        // Turned 90° left, local -Z points at world -X
        assert!(p.location().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_global_translation_ignores_orientation() {
        let mut p = Dummy(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        p.translate(Vec3::new(0.0, 0.0, -1.0), Frame::Global);
        assert!(p.location().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn test_global_rotation_orbits_origin() {
        let mut p = Dummy(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        p.rotate_y(std::f32::consts::PI, Frame::Global);
        assert!(p.location().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_local_rotation_keeps_position() {
        let start = Vec3::new(3.0, 4.0, 5.0);
        let mut p = Dummy(Mat4::from_translation(start));
        p.rotate_x(0.7, Frame::Local);
        p.rotate_y(-1.2, Frame::Local);
        assert!(p.location().abs_diff_eq(start, 1e-6));
    }
}
