//! Subcommand implementations and shared client plumbing

pub mod browse;
pub mod health;
pub mod list;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::HttpListingSource;

/// Connection settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub url: String,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn source(&self) -> Result<HttpListingSource> {
        Ok(HttpListingSource::new(&self.url, self.timeout)?)
    }
}

/// Spinner shown while a request is outstanding
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
