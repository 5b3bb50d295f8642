//! HTTP server with graceful shutdown

use axum::{http::HeaderValue, middleware, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::{Error, Result},
    middleware::{apply_request_tracking, apply_security_headers, log_requests},
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Wrap `app` in the transport middleware stack
    ///
    /// Layers added later run earlier, so the request id is assigned before
    /// tracing and logging observe the request.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let middleware_config = &self.config.middleware;
        let body_limit = middleware_config.body_limit_mb * 1024 * 1024;

        let mut app = app;

        if middleware_config.catch_panic {
            app = app.layer(CatchPanicLayer::new());
        }

        app = app
            .layer(middleware::from_fn(log_requests))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout(),
            ));

        if middleware_config.compression {
            app = app.layer(CompressionLayer::new());
        }

        app = apply_security_headers(app, &middleware_config.security_headers);
        app = app.layer(self.build_cors_layer());

        apply_request_tracking(app, &middleware_config.request_tracking)
    }

    /// Bind and serve until SIGINT or SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.service.host, self.config.service.port)
            .parse()
            .map_err(|err| {
                Error::Internal(format!(
                    "invalid bind address {}:{}: {}",
                    self.config.service.host, self.config.service.port, err
                ))
            })?;

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.apply_middleware(app);
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        // Peer addresses feed the rate limiter key
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Log middleware configuration for debugging
    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: {}", enabled(middleware.catch_panic));
        tracing::info!(
            "  - Request ID tracking: {}",
            enabled(middleware.request_tracking.request_id_enabled)
        );
        tracing::info!(
            "  - Sensitive header masking: {}",
            enabled(middleware.request_tracking.mask_sensitive_headers)
        );
        tracing::info!("  - Request body limit: {} MB", middleware.body_limit_mb);
        tracing::info!("  - Compression: {}", enabled(middleware.compression));
        tracing::info!("  - CORS mode: {}", middleware.cors_mode);
        tracing::info!(
            "  - Security headers: {}",
            enabled(middleware.security_headers.enabled)
        );
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );

        match middleware.rate_limit {
            Some(ref limit) if limit.enabled => {
                let (requests, window) = limit.quota_for(&self.config.service);
                tracing::info!(
                    "  - Listing rate limit: {} req / {} sec",
                    requests,
                    window.as_secs()
                );
            }
            _ => tracing::info!("  - Listing rate limit: not configured"),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build CORS layer based on configuration
    fn build_cors_layer(&self) -> CorsLayer {
        let middleware = &self.config.middleware;
        match middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                CorsLayer::permissive()
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                CorsLayer::new()
            }
            "origin" => match HeaderValue::from_str(&middleware.cors_origin) {
                Ok(origin) => {
                    tracing::debug!("Allowing CORS from {}", middleware.cors_origin);
                    CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods([http::Method::GET, http::Method::OPTIONS])
                        .allow_headers(Any)
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid CORS origin {:?}, denying cross-origin requests",
                        middleware.cors_origin
                    );
                    CorsLayer::new()
                }
            },
            other => {
                tracing::warn!("Unknown CORS mode: {}, defaulting to restrictive", other);
                CorsLayer::new()
            }
        }
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
