//! Offline traceroute runs read from `tr_run-<N>.out` files

use super::RunSource;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reads pre-recorded traceroute output instead of running the tool
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the fixture for a 1-indexed run
    pub fn path_for(&self, run_index: u32) -> PathBuf {
        self.dir.join(format!("tr_run-{}.out", run_index))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl RunSource for FixtureSource {
    async fn fetch(&self, run_index: u32) -> Result<String> {
        let path = self.path_for(run_index);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::missing_fixture(
                format!("File {} does not exist.", path.display()),
            )),
            Err(e) => Err(AppError::io(format!("Failed to read {}: {}", path.display(), e))),
        }
    }

    fn describe(&self) -> String {
        format!("fixtures in {}", self.dir.display())
    }

    fn inter_run_delay(&self) -> Duration {
        Duration::ZERO
    }
}
