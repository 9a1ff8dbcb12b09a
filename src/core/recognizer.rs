//! Wrapper around the external `face_recognition` command-line tool.
//!
//! The tool is invoked as `<program> [extra_args...] <known_dir> <probe>` and
//! prints one `<probe>,<name>[,<distance>]` line per face found in the probe.

use crate::common::{FaceLoginError, RecognizerConfig, Result};
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// A registered identity matched.
    Match(String),
    /// The tool answered with one of the no-match sentinels.
    Unknown(String),
}

#[derive(Debug, Clone)]
pub struct Recognizer {
    config: RecognizerConfig,
}

impl Recognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        Self { config }
    }

    pub fn identify(&self, db_dir: &Path, probe: &Path) -> Result<RecognitionResult> {
        tracing::debug!("Running {} {:?} {} {}",
                        self.config.program, self.config.extra_args, db_dir.display(), probe.display());

        let output = Command::new(&self.config.program)
            .args(&self.config.extra_args)
            .arg(db_dir)
            .arg(probe)
            .output()
            .map_err(|e| {
                tracing::error!("Could not start {}: {}", self.config.program, e);
                FaceLoginError::Io(e)
            })?;

        // stdout and stderr are reported together, like a terminal would show them.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            tracing::error!("Face recognition failed ({}):\n{}", output.status, text);
            return Err(FaceLoginError::Recognizer {
                status: output.status.to_string(),
                output: text.trim().to_string(),
            });
        }

        // Only stdout carries the answer; stderr may hold library warnings.
        parse_output(&String::from_utf8_lossy(&output.stdout), &self.config.unknown_sentinels)
    }
}

/// Extract the name from the first result line.
pub fn parse_output(text: &str, sentinels: &[String]) -> Result<RecognitionResult> {
    let line = text.trim().lines().next().unwrap_or("");

    let name = line.split(',')
        .nth(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| FaceLoginError::RecognizerOutput(text.trim().to_string()))?;

    if sentinels.iter().any(|s| s == name) {
        Ok(RecognitionResult::Unknown(name.to_string()))
    } else {
        Ok(RecognitionResult::Match(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinels() -> Vec<String> {
        RecognizerConfig::default().unknown_sentinels
    }

    #[test]
    fn parses_matched_name() {
        let result = parse_output("./.tmp.jpg,alice\n", &sentinels()).unwrap();
        assert_eq!(result, RecognitionResult::Match("alice".into()));
    }

    #[test]
    fn ignores_distance_column() {
        let result = parse_output("./.tmp.jpg,bob,0.3821\n", &sentinels()).unwrap();
        assert_eq!(result, RecognitionResult::Match("bob".into()));
    }

    #[test]
    fn recognizes_both_sentinels() {
        assert_eq!(
            parse_output("./.tmp.jpg,unknown_person", &sentinels()).unwrap(),
            RecognitionResult::Unknown("unknown_person".into())
        );
        assert_eq!(
            parse_output("./.tmp.jpg,no_persons_found", &sentinels()).unwrap(),
            RecognitionResult::Unknown("no_persons_found".into())
        );
    }

    #[test]
    fn uses_first_face_only() {
        let text = "./.tmp.jpg,carol\n./.tmp.jpg,dave\n";
        assert_eq!(parse_output(text, &sentinels()).unwrap(), RecognitionResult::Match("carol".into()));
    }

    #[test]
    fn missing_field_is_an_error() {
        assert!(matches!(
            parse_output("", &sentinels()),
            Err(FaceLoginError::RecognizerOutput(_))
        ));
        assert!(matches!(
            parse_output("no commas here", &sentinels()),
            Err(FaceLoginError::RecognizerOutput(_))
        ));
    }
}
