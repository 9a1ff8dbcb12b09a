use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceLoginError {
    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Webcam is not active")]
    CameraInactive,

    #[error("Recognizer exited with {status}: {output}")]
    Recognizer { status: String, output: String },

    #[error("Unexpected recognizer output: {0:?}")]
    RecognizerOutput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FaceLoginError>;
