use glam::{Mat4, Vec3};

use super::transform::SceneObject;

/// The player entity a camera rig is bound to.
#[derive(Debug, Clone)]
pub struct Player {
    transform: Mat4,
}

impl Player {
    pub fn new(transform: Mat4) -> Self {
        Self { transform }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(Mat4::from_translation(position))
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

impl SceneObject for Player {
    fn transform(&self) -> Mat4 { self.transform }

    fn set_transform(&mut self, transform: Mat4) { self.transform = transform; }
}
