pub mod camera;
pub mod common;
pub mod core;
pub mod gui;
pub mod storage;

// Re-export commonly used types
pub use common::{Config, DevMode, FaceLoginError, Result};
pub use camera::{CameraOpener, FrameSource, V4lOpener};
pub use crate::core::{LoginOutcome, LoginService, RecognitionResult, Recognizer, Webcam, WebcamState};
pub use storage::{AccessLog, FaceDatabase};
pub use gui::FaceLoginApp;
