use crate::camera::{convert, CameraOpener, FrameSource};
use crate::common::{CameraConfig, FaceLoginError, Result};
use image::RgbImage;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};
use std::fs;

#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub index: u32,
    pub name: String,
    pub formats: Vec<String>,
}

pub struct V4lCamera {
    stream: v4l::io::mmap::Stream<'static>,
    format: v4l::Format,
    index: u32,
    _device: Device,
}

impl V4lCamera {
    pub fn open(config: &CameraConfig) -> Result<Self> {
        let index = config.device_index;
        tracing::info!("Opening camera device {}...", index);

        let device = Device::new(index as usize)
            .map_err(|e| FaceLoginError::Camera(format!("Failed to open camera {}: {}", index, e)))?;

        let caps = device.query_caps()
            .map_err(|e| FaceLoginError::Camera(format!("Failed to query capabilities: {}", e)))?;

        if !caps.capabilities.contains(v4l::capability::Flags::VIDEO_CAPTURE) {
            tracing::warn!("Device {} ({}) may not support standard video capture", index, caps.card);
        }

        let mut fmt = device.format()
            .map_err(|e| FaceLoginError::Camera(format!("Failed to get format: {}", e)))?;

        fmt.width = config.width;
        fmt.height = config.height;
        fmt.fourcc = FourCC::new(b"MJPG");

        // Drivers may refuse the request; whatever they settle on is decoded below.
        if let Err(e) = device.set_format(&fmt) {
            tracing::warn!("Could not set {}x{} MJPG: {}. Using device defaults.",
                           config.width, config.height, e);
        }

        let format = device.format()
            .map_err(|e| FaceLoginError::Camera(format!("Failed to get final format: {}", e)))?;

        tracing::info!("Camera {} ({}) streaming {}x{} {}",
                       index, caps.card, format.width, format.height, fourcc_name(&format.fourcc));

        if format.width != config.width || format.height != config.height {
            tracing::warn!("Camera resolution {}x{} differs from requested {}x{}",
                           format.width, format.height, config.width, config.height);
        }

        let stream = v4l::io::mmap::Stream::with_buffers(&device, Type::VideoCapture, config.buffer_count)
            .map_err(|e| FaceLoginError::Camera(format!("Failed to create stream: {}", e)))?;

        Ok(Self {
            stream,
            format,
            index,
            _device: device,
        })
    }
}

impl FrameSource for V4lCamera {
    fn read_frame(&mut self) -> Result<RgbImage> {
        let (buf, meta) = self.stream.next()
            .map_err(|e| FaceLoginError::Camera(format!("Failed to capture: {}", e)))?;

        let used = (meta.bytesused as usize).min(buf.len());
        let data = if used == 0 { buf } else { &buf[..used] };

        convert::decode_frame(&self.format.fourcc.repr, data, self.format.width, self.format.height)
    }
}

impl Drop for V4lCamera {
    fn drop(&mut self) {
        tracing::info!("Releasing camera device {}", self.index);
    }
}

/// Opens `/dev/video<device_index>` on every attempt.
pub struct V4lOpener {
    config: CameraConfig,
}

impl V4lOpener {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }
}

impl CameraOpener for V4lOpener {
    fn open(&mut self) -> Result<Box<dyn FrameSource>> {
        Ok(Box::new(V4lCamera::open(&self.config)?))
    }
}

/// List capture devices under `/dev/video*` with the pixel formats they offer.
pub fn list_cameras() -> Result<Vec<CameraInfo>> {
    let mut cameras = Vec::new();

    for entry in fs::read_dir("/dev")? {
        let entry = entry?;
        let path = entry.path();
        let filename = path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");

        let Some(index) = filename.strip_prefix("video").and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };

        let Ok(device) = Device::new(index as usize) else {
            continue;
        };
        let Ok(caps) = device.query_caps() else {
            continue;
        };
        if !caps.capabilities.contains(v4l::capability::Flags::VIDEO_CAPTURE) {
            continue;
        }

        let formats = device.enum_formats()
            .unwrap_or_default()
            .iter()
            .map(|fmt| fourcc_name(&fmt.fourcc))
            .collect();

        cameras.push(CameraInfo {
            index,
            name: caps.card.clone(),
            formats,
        });
    }

    cameras.sort_by_key(|c| c.index);
    Ok(cameras)
}

fn fourcc_name(fourcc: &FourCC) -> String {
    fourcc.str().map(str::to_string).unwrap_or_else(|_| "UNKNOWN".to_string())
}
