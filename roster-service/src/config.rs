//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `ROSTER_`, nested keys split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/roster/{service_name}/config.toml
//! 4. System directory: /etc/roster/{service_name}/config.toml
//! 5. Default values
//!
//! For example `ROSTER_SERVICE__PORT=8080` overrides `service.port`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Service name used when no other name can be inferred
pub const DEFAULT_SERVICE_NAME: &str = "roster";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Record source configuration
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter directive (trace, debug, info, warn, error or a full EnvFilter string)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (development, test, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Development and test deployments get relaxed limits.
    pub fn is_development(&self) -> bool {
        matches!(self.environment.as_str(), "development" | "dev" | "test")
    }
}

/// Where the record collection comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// JSON file holding an array of `{ "id": .., "name": .. }` records.
    /// The built-in data set is used when unset.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request tracking configuration (request IDs, header propagation)
    #[serde(default)]
    pub request_tracking: RequestTrackingConfig,

    /// Security response headers
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,

    /// Rate limiting for the listing route (disabled when absent)
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimitConfig>,

    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS mode: "origin", "permissive" or "restrictive"
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,

    /// Allowed origin when `cors_mode` is "origin"
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_tracking: RequestTrackingConfig::default(),
            security_headers: SecurityHeadersConfig::default(),
            rate_limit: default_rate_limit(),
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Request tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTrackingConfig {
    /// Generate a request id when the caller did not send one
    #[serde(default = "default_true")]
    pub request_id_enabled: bool,

    /// Echo the request id back on the response
    #[serde(default = "default_true")]
    pub propagate_headers: bool,

    /// Mask sensitive headers in trace output
    #[serde(default = "default_true")]
    pub mask_sensitive_headers: bool,
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            request_id_enabled: true,
            propagate_headers: true,
            mask_sensitive_headers: true,
        }
    }
}

/// Security header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeadersConfig {
    /// Master switch
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Send `X-Content-Type-Options: nosniff`
    #[serde(default = "default_true")]
    pub x_content_type_options: bool,

    /// `X-Frame-Options` value; empty disables the header
    #[serde(default = "default_x_frame_options")]
    pub x_frame_options: String,

    /// Send `X-XSS-Protection: 0`
    #[serde(default = "default_true")]
    pub x_xss_protection: bool,

    /// `Referrer-Policy` value; empty disables the header
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,

    /// Send `Strict-Transport-Security` (only useful behind TLS termination)
    #[serde(default)]
    pub hsts: bool,

    /// HSTS max-age in seconds
    #[serde(default = "default_hsts_max_age")]
    pub hsts_max_age_secs: u64,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x_content_type_options: true,
            x_frame_options: default_x_frame_options(),
            x_xss_protection: true,
            referrer_policy: default_referrer_policy(),
            hsts: false,
            hsts_max_age_secs: default_hsts_max_age(),
        }
    }
}

/// Rate limit for the listing route, keyed by client address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable the limiter
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests allowed per window; environment default when unset
    #[serde(default)]
    pub max_requests: Option<u32>,

    /// Window length in seconds; environment default when unset
    #[serde(default)]
    pub window_secs: Option<u64>,

    /// Key clients by the first `X-Forwarded-For` hop instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: None,
            window_secs: None,
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    /// Resolve `(max_requests, window)` for the given service settings.
    ///
    /// Development and test allow 1000 requests per minute, everything else
    /// 100 requests per 15 minutes.
    pub fn quota_for(&self, service: &ServiceConfig) -> (u32, Duration) {
        let (requests, window) = if service.is_development() {
            (1000, 60)
        } else {
            (100, 15 * 60)
        };
        (
            self.max_requests.unwrap_or(requests),
            Duration::from_secs(self.window_secs.unwrap_or(window)),
        )
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_cors_mode() -> String {
    "origin".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_x_frame_options() -> String {
    "SAMEORIGIN".to_string()
}

fn default_referrer_policy() -> String {
    "no-referrer".to_string()
}

fn default_hsts_max_age() -> u64 {
    15_552_000 // 180 days
}

fn default_rate_limit() -> Option<RateLimitConfig> {
    Some(RateLimitConfig::default())
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name and used to locate
    /// per-service config directories.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later merges win
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("ROSTER_").split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the directory search; environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ROSTER_").split("__"))
            .extract()?;

        Ok(config)
    }

    /// Candidate config files, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        paths.push(PathBuf::from("config.toml"));

        let xdg_dirs = xdg::BaseDirectories::with_prefix("roster");
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Ok(path) = xdg_dirs.place_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/roster")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: DEFAULT_SERVICE_NAME.to_string(),
                host: default_host(),
                port: default_port(),
                log_level: default_log_level(),
                log_format: default_log_format(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            directory: DirectoryConfig::default(),
            middleware: MiddlewareConfig::default(),
        }
    }
}
