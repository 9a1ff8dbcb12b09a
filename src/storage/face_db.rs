use crate::common::{FaceLoginError, Result};
use crate::storage::write_jpeg;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSION: &str = "jpg";

/// One `<name>.jpg` per registered identity. This directory is what the
/// recognizer compares probes against.
#[derive(Debug, Clone)]
pub struct FaceDatabase {
    dir: PathBuf,
    jpeg_quality: u8,
}

impl FaceDatabase {
    pub fn open(dir: impl Into<PathBuf>, jpeg_quality: u8) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| FaceLoginError::Storage(format!("Failed to create {}: {}", dir.display(), e)))?;

        Ok(Self { dir, jpeg_quality })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn image_path(&self, name: &str) -> Result<PathBuf> {
        let name = sanitize_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, IMAGE_EXTENSION)))
    }

    /// Store `frame` as the reference image for `name`, replacing a previous registration.
    pub fn register(&self, name: &str, frame: &RgbImage) -> Result<PathBuf> {
        let path = self.image_path(name)?;

        if path.exists() {
            tracing::warn!("Overwriting existing registration at {}", path.display());
        }

        write_jpeg(&path, frame, self.jpeg_quality)?;
        tracing::info!("Registered {} at {}", name.trim(), path.display());
        Ok(path)
    }

    /// Registered names, sorted.
    pub fn identities(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_image = path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION))
                .unwrap_or(false);
            if !is_image {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Turn a typed name into a safe file stem.
///
/// Surrounding whitespace is trimmed and characters that are path separators,
/// reserved on common filesystems, or control characters become `_`. Names
/// that end up empty or consisting only of dots are rejected.
pub fn sanitize_name(raw: &str) -> Result<String> {
    let sanitized: String = raw.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return Err(FaceLoginError::InvalidName(raw.to_string()));
    }

    Ok(sanitized)
}
