//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::Config;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with a keuangan home directory and a default Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
    files: PathBuf,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("keuangan");
        let files = temp_dir.path().join("files");
        std::fs::create_dir_all(&files).unwrap();
        let config = Config::create(&root).await.unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
            files,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A path for a scratch file named `name`. The file is not created.
    pub fn path(&self, name: &str) -> PathBuf {
        self.files.join(name)
    }
}
