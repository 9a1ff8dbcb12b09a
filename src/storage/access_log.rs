use crate::common::Result;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub name: String,
    pub timestamp: String,
}

/// Append-only record of successful logins, one `name,timestamp` line each.
#[derive(Debug, Clone)]
pub struct AccessLog {
    path: PathBuf,
}

impl AccessLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, name: &str, at: DateTime<Local>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(name, at))?;

        tracing::debug!("Logged access for {} to {}", name, self.path.display());
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(contents.lines().filter_map(parse_line).collect())
    }
}

pub fn format_line(name: &str, at: DateTime<Local>) -> String {
    format!("{},{}", name, at.format(TIMESTAMP_FORMAT))
}

// Names may contain commas; the timestamp never does.
fn parse_line(line: &str) -> Option<LogEntry> {
    let (name, timestamp) = line.rsplit_once(',')?;
    Some(LogEntry {
        name: name.to_string(),
        timestamp: timestamp.to_string(),
    })
}
