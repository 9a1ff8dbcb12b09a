#![allow(dead_code)]

use face_login::common::RecognizerConfig;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory removed on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "face-login-{}-{}-{}",
            label,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.path).ok();
    }
}

pub fn sample_frame(shade: u8) -> RgbImage {
    RgbImage::from_pixel(64, 48, Rgb([shade, shade / 2, 255 - shade]))
}

/// Recognizer config that runs `body` as a shell script. `$1` is the database
/// directory and `$2` the probe image, as with the real tool.
pub fn script_recognizer(dir: &TestDir, body: &str) -> RecognizerConfig {
    let script = dir.join("recognizer.sh");
    fs::write(&script, body).unwrap();

    RecognizerConfig {
        program: "sh".to_string(),
        extra_args: vec![script.display().to_string()],
        ..RecognizerConfig::default()
    }
}
