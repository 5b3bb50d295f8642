//! One log line per completed request, leveled by outcome and latency

use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::ids::request_id_from;

/// Requests slower than this are flagged as slow
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(1);

/// Requests slower than this are flagged as very slow
pub const VERY_SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(3);

/// How a finished request is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// 5xx
    ServerError,
    /// 4xx
    ClientError,
    /// Over [`VERY_SLOW_REQUEST_THRESHOLD`]
    VerySlow,
    /// Over [`SLOW_REQUEST_THRESHOLD`]
    Slow,
    /// Everything else
    Ok,
}

impl Completion {
    /// Classify by status first, then latency
    pub fn classify(status: StatusCode, elapsed: Duration) -> Self {
        if status.is_server_error() {
            Completion::ServerError
        } else if status.is_client_error() {
            Completion::ClientError
        } else if elapsed > VERY_SLOW_REQUEST_THRESHOLD {
            Completion::VerySlow
        } else if elapsed > SLOW_REQUEST_THRESHOLD {
            Completion::Slow
        } else {
            Completion::Ok
        }
    }
}

/// Axum middleware logging each request once the response is ready
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request_id_from(request.headers());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();
    let duration_ms = elapsed.as_millis() as u64;

    macro_rules! completed {
        ($level:ident, $msg:literal) => {
            tracing::$level!(
                request_id = ?request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms,
                slow = elapsed > SLOW_REQUEST_THRESHOLD,
                very_slow = elapsed > VERY_SLOW_REQUEST_THRESHOLD,
                user_agent = ?user_agent,
                $msg
            )
        };
    }

    match Completion::classify(status, elapsed) {
        Completion::ServerError => completed!(error, "Request completed with server error"),
        Completion::ClientError => completed!(warn, "Request completed with client error"),
        Completion::VerySlow => completed!(warn, "Request completed - VERY SLOW"),
        Completion::Slow => completed!(warn, "Request completed - SLOW"),
        Completion::Ok => completed!(info, "Request completed"),
    }

    response
}
