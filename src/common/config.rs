use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::common::error::{FaceLoginError, Result};

const LOCAL_CONFIG_PATH: &str = "configs/face-login.toml";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub device_index: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Delay between two frame reads while the webcam is active.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Delay before reopening after a failed open.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Pause after releasing a held device, before opening it again.
    #[serde(default = "default_release_delay")]
    pub release_delay_ms: u64,
    #[serde(default = "default_buffer_count")]
    pub buffer_count: u32,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }
fn default_poll_interval() -> u64 { 20 }
fn default_retry_delay() -> u64 { 3000 }
fn default_release_delay() -> u64 { 500 }
fn default_buffer_count() -> u32 { 4 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: default_width(),
            height: default_height(),
            poll_interval_ms: default_poll_interval(),
            retry_delay_ms: default_retry_delay(),
            release_delay_ms: default_release_delay(),
            buffer_count: default_buffer_count(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecognizerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Passed before the database and probe paths, e.g. `--tolerance 0.5`.
    #[serde(default)]
    pub extra_args: Vec<String>,
    #[serde(default = "default_sentinels")]
    pub unknown_sentinels: Vec<String>,
}

fn default_program() -> String { "face_recognition".to_string() }
fn default_sentinels() -> Vec<String> {
    vec!["unknown_person".to_string(), "no_persons_found".to_string()]
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            extra_args: Vec::new(),
            unknown_sentinels: default_sentinels(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_dir")]
    pub db_dir: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    #[serde(default = "default_probe_path")]
    pub probe_path: PathBuf,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_db_dir() -> PathBuf { PathBuf::from("./db") }
fn default_log_path() -> PathBuf { PathBuf::from("./log.txt") }
fn default_probe_path() -> PathBuf { PathBuf::from("./.tmp.jpg") }
fn default_jpeg_quality() -> u8 { 95 }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_dir: default_db_dir(),
            log_path: default_log_path(),
            probe_path: default_probe_path(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_window_width")]
    pub width: f32,
    #[serde(default = "default_window_height")]
    pub height: f32,
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
    #[serde(default = "default_preview_height")]
    pub preview_height: u32,
}

fn default_title() -> String { "Face Recognition".to_string() }
fn default_window_width() -> f32 { 1200.0 }
fn default_window_height() -> f32 { 520.0 }
fn default_preview_width() -> u32 { 700 }
fn default_preview_height() -> u32 { 500 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_window_width(),
            height: default_window_height(),
            preview_width: default_preview_width(),
            preview_height: default_preview_height(),
        }
    }
}

impl Config {
    /// Loads the first config file found, or the built-in defaults when none exists.
    pub fn load() -> Result<Self> {
        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                return Self::load_from_path(&candidate);
            }
        }

        tracing::info!("No config file found, using defaults");
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_PATH)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("face-login").join("face-login.toml"));
        }
        paths
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FaceLoginError::Config(format!(
                "Config file not found: {}", path.display()
            )));
        }

        tracing::info!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| FaceLoginError::Config(format!("Config parse error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.camera.width == 0 || self.camera.width > 4096 {
            return Err(FaceLoginError::Config(format!(
                "Camera width must be between 1 and 4096, got {}", self.camera.width
            )));
        }
        if self.camera.height == 0 || self.camera.height > 4096 {
            return Err(FaceLoginError::Config(format!(
                "Camera height must be between 1 and 4096, got {}", self.camera.height
            )));
        }
        if self.camera.poll_interval_ms == 0 {
            return Err(FaceLoginError::Config(
                "Camera poll interval must be at least 1 ms".into()
            ));
        }
        if self.camera.retry_delay_ms == 0 {
            return Err(FaceLoginError::Config(
                "Camera retry delay must be at least 1 ms".into()
            ));
        }
        if self.camera.buffer_count == 0 {
            return Err(FaceLoginError::Config(
                "Camera buffer count must be at least 1".into()
            ));
        }

        if self.window.preview_width == 0 || self.window.preview_width > 4096 {
            return Err(FaceLoginError::Config(format!(
                "Preview width must be between 1 and 4096, got {}", self.window.preview_width
            )));
        }
        if self.window.preview_height == 0 || self.window.preview_height > 4096 {
            return Err(FaceLoginError::Config(format!(
                "Preview height must be between 1 and 4096, got {}", self.window.preview_height
            )));
        }

        if self.recognizer.program.trim().is_empty() {
            return Err(FaceLoginError::Config("Recognizer program must not be empty".into()));
        }

        if self.storage.db_dir.as_os_str().is_empty() {
            return Err(FaceLoginError::Config("Database directory must not be empty".into()));
        }
        if self.storage.jpeg_quality == 0 || self.storage.jpeg_quality > 100 {
            return Err(FaceLoginError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}", self.storage.jpeg_quality
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.poll_interval_ms, 20);
        assert_eq!(config.camera.retry_delay_ms, 3000);
        assert_eq!(config.recognizer.program, "face_recognition");
        assert_eq!(config.storage.db_dir, PathBuf::from("./db"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = Config::from_toml(
            r#"
            [camera]
            device_index = 2

            [storage]
            db_dir = "/srv/faces"
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.device_index, 2);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.storage.db_dir, PathBuf::from("/srv/faces"));
        assert_eq!(config.storage.log_path, PathBuf::from("./log.txt"));
        assert_eq!(config.recognizer.unknown_sentinels.len(), 2);
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let result = Config::from_toml("[camera]\npoll_interval_ms = 0\n");
        assert!(matches!(result, Err(FaceLoginError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_jpeg_quality() {
        let mut config = Config::default();
        config.storage.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = Config::load_from_path(Path::new("/nonexistent/face-login.toml"));
        assert!(matches!(result, Err(FaceLoginError::Config(_))));
    }
}
