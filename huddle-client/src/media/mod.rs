mod media_controller;
mod media_devices;
mod media_track;
mod sample_track;

pub use media_controller::*;
pub use media_devices::*;
pub use media_track::*;
pub use sample_track::*;
