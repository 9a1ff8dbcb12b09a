use std::path::PathBuf;
use std::fs;
use crate::common::config::StorageConfig;
use crate::common::error::Result;

/// Development mode keeps every file the app writes under `./dev_data`.
#[derive(Debug, Clone)]
pub struct DevMode {
    enabled: bool,
    base_dir: PathBuf,
}

impl DevMode {
    pub fn new(enabled: bool) -> Result<Self> {
        Self::with_base_dir(enabled, PathBuf::from("./dev_data"))
    }

    pub fn with_base_dir(enabled: bool, base_dir: PathBuf) -> Result<Self> {
        if enabled {
            fs::create_dir_all(base_dir.join("db"))?;

            tracing::info!("Development mode enabled - data will be saved to: {}",
                           base_dir.display());
        }

        Ok(Self { enabled, base_dir })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Redirects the storage paths into the dev directory. No-op when disabled.
    pub fn apply(&self, storage: &mut StorageConfig) {
        if !self.enabled {
            return;
        }

        storage.db_dir = self.base_dir.join("db");
        storage.log_path = self.base_dir.join("log.txt");
        storage.probe_path = self.base_dir.join(".tmp.jpg");
        tracing::debug!("Storage redirected to {:?}", self.base_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_leaves_storage_untouched() {
        let dev_mode = DevMode::with_base_dir(false, PathBuf::from("unused")).unwrap();
        let mut storage = StorageConfig::default();
        dev_mode.apply(&mut storage);
        assert_eq!(storage.db_dir, PathBuf::from("./db"));
        assert_eq!(storage.probe_path, PathBuf::from("./.tmp.jpg"));
    }

    #[test]
    fn enabled_redirects_all_paths() {
        let base = std::env::temp_dir().join(format!("face-login-dev-{}", std::process::id()));
        let dev_mode = DevMode::with_base_dir(true, base.clone()).unwrap();
        let mut storage = StorageConfig::default();
        dev_mode.apply(&mut storage);

        assert!(dev_mode.is_enabled());
        assert_eq!(storage.db_dir, base.join("db"));
        assert_eq!(storage.log_path, base.join("log.txt"));
        assert_eq!(storage.probe_path, base.join(".tmp.jpg"));
        assert!(base.join("db").is_dir());

        fs::remove_dir_all(&base).ok();
    }
}
