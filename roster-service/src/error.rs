//! Error types and HTTP response conversion

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::directory::ListingError;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record collection could not be loaded
    #[error("Data error: {0}")]
    Data(String),

    /// Listing request was rejected or failed
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// No route matched
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client exceeded its request quota
    #[error("Rate limit exceeded")]
    RateLimitExceeded {
        /// How long until the next request would be admitted
        retry_after: Duration,
    },

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Data(err.to_string())
    }
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Listing(err) => err.status_code(),
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::Config(_) | Error::Io(_) | Error::Data(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Listing(err) => err.code(),
            Error::NotFound(_) => "NOT_FOUND",
            Error::RateLimitExceeded { .. } => "TOO_MANY_REQUESTS",
            Error::Config(_) | Error::Io(_) | Error::Data(_) | Error::Internal(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// Message safe to show to API clients
    pub fn public_message(&self) -> String {
        match self {
            Error::Listing(err) => err.public_message(),
            Error::NotFound(what) => format!("Route {} not found", what),
            Error::RateLimitExceeded { .. } => {
                "Too many requests from this IP, please try again later.".to_string()
            }
            Error::Config(_) | Error::Io(_) | Error::Data(_) | Error::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Client-correctable errors, logged at warn instead of error
    pub fn is_operational(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Attach the id of the request that failed
    pub fn with_request_id(self, request_id: Option<String>) -> RequestError {
        RequestError {
            error: self,
            request_id,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,

    /// Machine-readable error code (e.g. `VALIDATION_ERROR`)
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Id of the failed request, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// RFC 3339 time the error was produced
    pub timestamp: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
            request_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Set the request id
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// An [`Error`] tied to the request that produced it
#[derive(Debug)]
pub struct RequestError {
    /// The failure
    pub error: Error,
    /// Request id for client correlation
    pub request_id: Option<String>,
}

impl From<Error> for RequestError {
    fn from(error: Error) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let code = self.error.code();

        if self.error.is_operational() {
            tracing::warn!(
                request_id = ?self.request_id,
                code,
                status = status.as_u16(),
                "Operational error occurred: {}", self.error
            );
        } else {
            tracing::error!(
                request_id = ?self.request_id,
                code,
                status = status.as_u16(),
                "Unexpected error occurred: {}", self.error
            );
        }

        let body = ErrorResponse::new(code, self.error.public_message())
            .with_request_id(self.request_id);
        let mut response = (status, Json(body)).into_response();

        if let Error::RateLimitExceeded { retry_after } = self.error {
            // Round up so clients never retry early
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        RequestError::from(self).into_response()
    }
}
