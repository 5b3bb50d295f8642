//! Security response headers
//!
//! Headers a handler already set are left alone, except HSTS which always
//! reflects configuration.

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityHeadersConfig;

/// Add the configured security headers to every response from `app`
pub fn apply_security_headers(mut app: Router, config: &SecurityHeadersConfig) -> Router {
    if !config.enabled {
        return app;
    }

    // Only meaningful when a proxy in front terminates TLS
    if config.hsts {
        let value = format!("max-age={}", config.hsts_max_age_secs);
        if let Ok(hv) = HeaderValue::from_str(&value) {
            app = app.layer(SetResponseHeaderLayer::overriding(
                header::STRICT_TRANSPORT_SECURITY,
                hv,
            ));
        }
    }

    if config.x_content_type_options {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));
    }

    if !config.x_frame_options.is_empty() {
        match HeaderValue::from_str(&config.x_frame_options) {
            Ok(hv) => {
                app = app.layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    hv,
                ));
            }
            Err(_) => tracing::warn!(
                value = %config.x_frame_options,
                "Ignoring invalid X-Frame-Options value"
            ),
        }
    }

    // 0 disables the legacy browser XSS auditor
    if config.x_xss_protection {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ));
    }

    if !config.referrer_policy.is_empty() {
        match HeaderValue::from_str(&config.referrer_policy) {
            Ok(hv) => {
                app = app.layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    hv,
                ));
            }
            Err(_) => tracing::warn!(
                value = %config.referrer_policy,
                "Ignoring invalid Referrer-Policy value"
            ),
        }
    }

    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn headers_for(config: &SecurityHeadersConfig) -> axum::http::HeaderMap {
        let app = apply_security_headers(Router::new().route("/", get(|| async { "ok" })), config);
        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[tokio::test]
    async fn test_defaults() {
        let headers = headers_for(&SecurityHeadersConfig::default()).await;
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
        assert_eq!(headers[header::X_XSS_PROTECTION], "0");
        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
        assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[tokio::test]
    async fn test_hsts_when_enabled() {
        let config = SecurityHeadersConfig {
            hsts: true,
            hsts_max_age_secs: 60,
            ..Default::default()
        };
        let headers = headers_for(&config).await;
        assert_eq!(headers[header::STRICT_TRANSPORT_SECURITY], "max-age=60");
    }

    #[tokio::test]
    async fn test_disabled() {
        let config = SecurityHeadersConfig {
            enabled: false,
            ..Default::default()
        };
        let headers = headers_for(&config).await;
        assert!(headers.get(header::X_CONTENT_TYPE_OPTIONS).is_none());
    }
}
