pub mod convert;
pub mod v4l2;

use crate::common::Result;
use image::RgbImage;

pub use v4l2::{list_cameras, CameraInfo, V4lCamera, V4lOpener};

/// An open capture device. Dropping it releases the device.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<RgbImage>;
}

/// Produces a fresh [`FrameSource`] on every call; used for the initial open and each retry.
pub trait CameraOpener {
    fn open(&mut self) -> Result<Box<dyn FrameSource>>;
}
