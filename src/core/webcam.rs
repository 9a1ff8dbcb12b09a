//! Webcam acquisition with retry.
//!
//! Nothing here blocks on a timer: the owner calls [`Webcam::tick`] from its
//! event loop and schedules the next call at [`Webcam::next_due`].

use crate::camera::{CameraOpener, FrameSource};
use crate::common::{CameraConfig, FaceLoginError, Result};
use image::{Rgb, RgbImage};
use std::time::{Duration, Instant};

const ERROR_FRAME_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

/// What the preview should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebcamState {
    Active,
    Inactive,
}

/// Outcome of a single [`Webcam::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Not due yet.
    Idle,
    /// A new frame replaced the previous one.
    NewFrame,
    /// The camera could not be opened or read; the error frame is showing.
    Failed,
}

pub struct Webcam {
    opener: Box<dyn CameraOpener>,
    source: Option<Box<dyn FrameSource>>,
    state: WebcamState,
    frame: RgbImage,
    generation: u64,
    next_due: Instant,
    poll_interval: Duration,
    retry_delay: Duration,
    release_delay: Duration,
    error_frame_size: (u32, u32),
}

impl Webcam {
    pub fn new(opener: Box<dyn CameraOpener>, config: &CameraConfig, error_frame_size: (u32, u32)) -> Self {
        Self {
            opener,
            source: None,
            state: WebcamState::Inactive,
            frame: error_frame(error_frame_size.0, error_frame_size.1),
            generation: 0,
            next_due: Instant::now(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            release_delay: Duration::from_millis(config.release_delay_ms),
            error_frame_size,
        }
    }

    pub fn start(&mut self, now: Instant) -> TickEvent {
        self.try_open(now)
    }

    pub fn tick(&mut self, now: Instant) -> TickEvent {
        if now < self.next_due {
            return TickEvent::Idle;
        }

        match self.state {
            WebcamState::Active => self.poll(now),
            WebcamState::Inactive => self.try_open(now),
        }
    }

    fn poll(&mut self, now: Instant) -> TickEvent {
        let Some(source) = self.source.as_mut() else {
            return self.try_open(now);
        };

        match source.read_frame() {
            Ok(frame) => {
                self.set_frame(frame);
                self.next_due = now + self.poll_interval;
                TickEvent::NewFrame
            }
            Err(e) => {
                tracing::warn!("Failed to read frame from webcam: {}", e);
                self.state = WebcamState::Inactive;
                self.try_open(now)
            }
        }
    }

    fn try_open(&mut self, now: Instant) -> TickEvent {
        if self.source.take().is_some() && !self.release_delay.is_zero() {
            std::thread::sleep(self.release_delay);
        }

        let opened = self.opener.open().and_then(|mut source| {
            // A device that opens but cannot deliver a frame counts as a failed open.
            let frame = source.read_frame()?;
            Ok((source, frame))
        });

        match opened {
            Ok((source, frame)) => {
                tracing::info!("Webcam initialized successfully");
                self.source = Some(source);
                self.state = WebcamState::Active;
                self.set_frame(frame);
                self.next_due = now + self.poll_interval;
                TickEvent::NewFrame
            }
            Err(e) => {
                tracing::warn!("Error initializing webcam: {}. Retrying in {:?}", e, self.retry_delay);
                self.show_error(now);
                TickEvent::Failed
            }
        }
    }

    fn show_error(&mut self, now: Instant) {
        self.state = WebcamState::Inactive;
        self.set_frame(error_frame(self.error_frame_size.0, self.error_frame_size.1));
        self.next_due = now + self.retry_delay;
    }

    fn set_frame(&mut self, frame: RgbImage) {
        self.frame = frame;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn state(&self) -> WebcamState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == WebcamState::Active
    }

    /// The frame to display: the latest capture, or the error frame.
    pub fn display_frame(&self) -> &RgbImage {
        &self.frame
    }

    /// Bumped whenever [`display_frame`](Self::display_frame) changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy of the latest capture, only while the webcam is active.
    pub fn snapshot(&self) -> Option<RgbImage> {
        self.is_active().then(|| self.frame.clone())
    }

    /// Like [`snapshot`](Self::snapshot), for callers that report the inactive case.
    pub fn capture(&self) -> Result<RgbImage> {
        self.snapshot().ok_or(FaceLoginError::CameraInactive)
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn release(&mut self) {
        if self.source.take().is_some() {
            tracing::info!("Webcam released");
        }
        self.state = WebcamState::Inactive;
    }
}

impl Drop for Webcam {
    fn drop(&mut self) {
        self.release();
    }
}

pub fn error_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, ERROR_FRAME_COLOR)
}
