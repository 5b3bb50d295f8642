//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    pub version: String,

    /// RFC 3339 time of the check
    pub timestamp: String,

    /// Time since startup
    pub uptime: Uptime,

    /// Deployment environment
    pub environment: String,

    /// Records available for listing
    pub records: usize,
}

/// Process uptime
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Uptime {
    /// Whole seconds
    pub seconds: u64,

    /// e.g. `1d 2h 3m 4s`
    pub formatted: String,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReadinessResponse {
    /// Ready to serve listings
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Records available for listing
    pub records: usize,
}

/// Liveness probe with uptime details
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
))]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.uptime();
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: Uptime {
            seconds: uptime.as_secs(),
            formatted: format_uptime(uptime),
        },
        environment: state.config().service.environment.clone(),
        records: state.directory().len(),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// The directory is loaded before the listener binds, so a running server is
/// always ready.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let response = ReadinessResponse {
        ready: true,
        service: state.config().service.name.clone(),
        records: state.directory().len(),
    };

    (StatusCode::OK, Json(response))
}

/// Render a duration as `1d 2h 3m 4s`, dropping zero units except seconds
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));

    parts.join(" ")
}
