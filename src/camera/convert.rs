//! Raw V4L2 buffers to RGB frames.

use crate::common::{FaceLoginError, Result};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

pub fn decode_frame(fourcc: &[u8; 4], data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    match fourcc {
        b"MJPG" | b"JPEG" => {
            let image = image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
            Ok(image.to_rgb8())
        }
        b"YUYV" => yuyv_to_rgb(data, width, height),
        b"RGB3" => {
            let expected = (width * height * 3) as usize;
            let raw = data.get(..expected).ok_or_else(|| short_buffer("RGB3", expected, data.len()))?;
            RgbImage::from_raw(width, height, raw.to_vec())
                .ok_or_else(|| FaceLoginError::Camera("Failed to create RGB image buffer".into()))
        }
        b"GREY" => {
            let expected = (width * height) as usize;
            let raw = data.get(..expected).ok_or_else(|| short_buffer("GREY", expected, data.len()))?;
            let gray = GrayImage::from_raw(width, height, raw.to_vec())
                .ok_or_else(|| FaceLoginError::Camera("Failed to create grayscale image buffer".into()))?;
            Ok(DynamicImage::ImageLuma8(gray).to_rgb8())
        }
        other => Err(FaceLoginError::Camera(format!(
            "Unsupported pixel format {}", String::from_utf8_lossy(other)
        ))),
    }
}

/// Packed 4:2:2, two pixels per `Y0 U Y1 V` quad.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let expected = (width * height * 2) as usize;
    if data.len() < expected {
        return Err(short_buffer("YUYV", expected, data.len()));
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for quad in data[..expected].chunks_exact(4) {
        let (y0, u, y1, v) = (quad[0] as f32, quad[1] as f32, quad[2] as f32, quad[3] as f32);
        rgb.extend_from_slice(&yuv_to_rgb(y0, u, v));
        rgb.extend_from_slice(&yuv_to_rgb(y1, u, v));
    }

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| FaceLoginError::Camera("Failed to create RGB image buffer".into()))
}

fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    let y = y - 16.0;
    let u = u - 128.0;
    let v = v - 128.0;

    let r = (1.164 * y + 1.596 * v).clamp(0.0, 255.0) as u8;
    let g = (1.164 * y - 0.392 * u - 0.813 * v).clamp(0.0, 255.0) as u8;
    let b = (1.164 * y + 2.017 * u).clamp(0.0, 255.0) as u8;

    [r, g, b]
}

fn short_buffer(format: &str, expected: usize, got: usize) -> FaceLoginError {
    FaceLoginError::Camera(format!(
        "{} buffer too short: expected {} bytes, got {}", format, expected, got
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_black_and_white() {
        // Two pixels: black (Y=16) and white (Y=235), neutral chroma.
        let data = [16u8, 128, 235, 128];
        let image = yuyv_to_rgb(&data, 2, 1).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(1, 0).0, [254, 254, 254]);
    }

    #[test]
    fn yuyv_rejects_short_buffer() {
        let result = yuyv_to_rgb(&[0u8; 6], 2, 2);
        assert!(matches!(result, Err(FaceLoginError::Camera(_))));
    }

    #[test]
    fn grey_expands_to_rgb() {
        let image = decode_frame(b"GREY", &[10, 200], 2, 1).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [10, 10, 10]);
        assert_eq!(image.get_pixel(1, 0).0, [200, 200, 200]);
    }

    #[test]
    fn unsupported_format_is_a_camera_error() {
        let result = decode_frame(b"H264", &[0; 16], 2, 2);
        assert!(matches!(result, Err(FaceLoginError::Camera(msg)) if msg.contains("H264")));
    }
}
