pub mod autoplay;
pub mod controller;
pub mod gesture;
pub mod navigation;
pub mod playback;

pub use controller::{ShowOptions, SlideshowController};
pub use navigation::Direction;
pub use playback::DeviceClass;
