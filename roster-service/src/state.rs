//! Application state shared across handlers

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{config::Config, directory::Directory, error::Result};

/// Application state shared across handlers
///
/// Cheap to clone: configuration sits behind an `Arc` and the directory
/// shares its record slice.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    directory: Directory,
    started_at: Instant,
}

impl AppState {
    /// Create state around an already loaded directory
    pub fn new(config: Config, directory: Directory) -> Self {
        Self {
            config: Arc::new(config),
            directory,
            started_at: Instant::now(),
        }
    }

    /// Load the directory named in the configuration and build state from it
    pub fn from_config(config: Config) -> Result<Self> {
        let directory = Directory::load(config.directory.data_path.as_deref())?;
        Ok(Self::new(config, directory))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the record directory
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Time since this state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
