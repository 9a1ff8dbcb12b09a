pub mod access_log;
pub mod face_db;

pub use access_log::{AccessLog, LogEntry};
pub use face_db::{sanitize_name, FaceDatabase};

use crate::common::Result;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode `frame` as JPEG at `path`, replacing any existing file.
pub fn write_jpeg(path: &Path, frame: &RgbImage, quality: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode(frame.as_raw(), frame.width(), frame.height(), ColorType::Rgb8)?;
    writer.flush()?;
    Ok(())
}
