//! Request id assignment, echo and header masking

use axum::{http::HeaderName, Router};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::{config::RequestTrackingConfig, ids::MakeTypedRequestId};

/// Request headers masked in trace output
pub fn sensitive_headers() -> [HeaderName; 4] {
    [
        axum::http::header::AUTHORIZATION,
        axum::http::header::COOKIE,
        axum::http::header::SET_COOKIE,
        HeaderName::from_static("x-api-key"),
    ]
}

/// Assign a `req_…` id to requests that arrive without `x-request-id`
///
/// An id supplied by an upstream proxy is kept unchanged.
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

/// Copy the request id onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Mark credential-bearing headers as sensitive so traces redact them
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(sensitive_headers())
}

/// Wrap `app` in the tracking layers enabled by `config`
///
/// Must be applied outside any layer that reads the request id.
pub fn apply_request_tracking(mut app: Router, config: &RequestTrackingConfig) -> Router {
    if config.mask_sensitive_headers {
        app = app.layer(sensitive_headers_layer());
    }
    if config.propagate_headers {
        app = app.layer(request_id_propagation_layer());
    }
    if config.request_id_enabled {
        app = app.layer(request_id_layer());
    }
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::REQUEST_ID_HEADER;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app(config: &RequestTrackingConfig) -> Router {
        apply_request_tracking(Router::new().route("/", get(|| async { "ok" })), config)
    }

    #[tokio::test]
    async fn test_generated_id_is_echoed() {
        let response = app(&RequestTrackingConfig::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(id.starts_with("req_"));
    }

    #[tokio::test]
    async fn test_upstream_id_is_kept() {
        let response = app(&RequestTrackingConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "upstream-abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "upstream-abc");
    }

    #[tokio::test]
    async fn test_disabled_tracking_adds_nothing() {
        let config = RequestTrackingConfig {
            request_id_enabled: false,
            propagate_headers: false,
            mask_sensitive_headers: false,
        };
        let response = app(&config)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());
    }

    #[test]
    fn test_sensitive_headers_cover_credentials() {
        let headers = sensitive_headers();
        assert!(headers.contains(&axum::http::header::AUTHORIZATION));
        assert!(headers.contains(&HeaderName::from_static("x-api-key")));
    }
}
