pub mod config;
pub mod dev_mode;
pub mod error;

pub use config::{Config, CameraConfig, RecognizerConfig, StorageConfig, WindowConfig};
pub use dev_mode::DevMode;
pub use error::{FaceLoginError, Result};
