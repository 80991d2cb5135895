// MODEL: Scene objects driven by the rig
pub mod transform;
pub mod camera;
pub mod player;

pub use transform::{Frame, SceneObject};
pub use camera::Camera;
pub use player::Player;
