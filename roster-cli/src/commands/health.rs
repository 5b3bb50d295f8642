//! `roster health`: report on a running service

use anyhow::{Context, Result};
use colored::Colorize;

use super::{spinner, ClientOptions};

pub async fn execute(options: &ClientOptions, verbose: bool) -> Result<()> {
    let source = options.source()?;

    let pb = spinner("Checking service health...");
    let health = source.health().await;
    pb.finish_and_clear();
    let health = health.with_context(|| format!("Health check against {} failed", options.url))?;

    let status = if health.status == "healthy" {
        health.status.green().bold()
    } else {
        health.status.yellow().bold()
    };

    println!("{} {}", "Status:".bold(), status);
    println!("{} {}", "Uptime:".bold(), health.uptime.formatted);
    println!("{} {}", "Version:".bold(), health.version);

    if verbose {
        println!("{} {}", "Service:".bold(), health.service);
        println!("{} {}", "Environment:".bold(), health.environment);
        println!("{} {}", "Records:".bold(), health.records);
        println!("{} {}", "Checked at:".bold(), health.timestamp);
    }

    Ok(())
}
