// CONTROLLER: Input, navigation, and per-frame glue
pub mod input;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputSource, InputState, Key, KeyBindings, ScrollAccumulator};
pub use camera_controller::{NavigationController, NavigationMode};
pub use frame_loop::{CameraUniform, FrameClock};
