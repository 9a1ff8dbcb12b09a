use crate::common::{Config, FaceLoginError, Result};
use crate::core::recognizer::{RecognitionResult, Recognizer};
use crate::storage::{write_jpeg, AccessLog, FaceDatabase};
use image::RgbImage;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Welcome(String),
    Unknown,
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Welcome(_))
    }

    pub fn message(&self) -> String {
        match self {
            LoginOutcome::Welcome(name) => format!("welcome, {}", name),
            LoginOutcome::Unknown => "Unknown user, register user or try again".to_string(),
        }
    }
}

/// Text shown to the user when a login attempt errors out.
pub fn failure_message(error: &FaceLoginError) -> String {
    match error {
        FaceLoginError::Recognizer { .. } => "Face recognition failed.".to_string(),
        other => format!("An error occurred: {}", other),
    }
}

/// Writes the probe, asks the recognizer, and records successful logins.
#[derive(Debug, Clone)]
pub struct LoginService {
    database: FaceDatabase,
    recognizer: Recognizer,
    access_log: AccessLog,
    probe_path: PathBuf,
    jpeg_quality: u8,
}

impl LoginService {
    pub fn new(database: FaceDatabase, recognizer: Recognizer, access_log: AccessLog,
               probe_path: PathBuf, jpeg_quality: u8) -> Self {
        Self {
            database,
            recognizer,
            access_log,
            probe_path,
            jpeg_quality,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            FaceDatabase::open(&config.storage.db_dir, config.storage.jpeg_quality)?,
            Recognizer::new(config.recognizer.clone()),
            AccessLog::new(&config.storage.log_path),
            config.storage.probe_path.clone(),
            config.storage.jpeg_quality,
        ))
    }

    pub fn database(&self) -> &FaceDatabase {
        &self.database
    }

    pub fn access_log(&self) -> &AccessLog {
        &self.access_log
    }

    pub fn login(&self, frame: &RgbImage) -> Result<LoginOutcome> {
        write_jpeg(&self.probe_path, frame, self.jpeg_quality)?;

        match self.recognizer.identify(self.database.dir(), &self.probe_path)? {
            RecognitionResult::Match(name) => {
                self.access_log.append(&name, chrono::Local::now())?;
                tracing::info!("Login succeeded for {}", name);
                Ok(LoginOutcome::Welcome(name))
            }
            RecognitionResult::Unknown(sentinel) => {
                tracing::info!("Login rejected: {}", sentinel);
                Ok(LoginOutcome::Unknown)
            }
        }
    }
}
