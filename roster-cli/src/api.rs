//! HTTP access to a roster service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use roster_service::{error::ErrorResponse, handlers::ListResponse, health::HealthResponse};
use thiserror::Error;

use crate::pager::BrowseState;

/// Anything that went wrong talking to the service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer; `message` is the server's own when it sent an error envelope
    #[error("Server returned {status}: {message}")]
    Server { status: StatusCode, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Fetch task failed: {0}")]
    Task(String),
}

/// Where listing pages come from
#[async_trait]
pub trait ListingSource: Send + Sync + 'static {
    async fn fetch(&self, state: &BrowseState) -> Result<ListResponse, ApiError>;
}

/// Listing source backed by a running service
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: Client,
    base_url: String,
}

impl HttpListingSource {
    /// `base_url` is the API mount, e.g. `http://localhost:3001/api`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    /// Listing URL for `state`, sort only present when set
    pub fn users_url(&self, state: &BrowseState) -> String {
        let mut url = format!(
            "{}/users?page={}&size={}",
            self.base_url,
            state.page(),
            state.size()
        );
        if let Some(sort) = state.sort() {
            url.push_str("&sort=");
            url.push_str(sort.as_str());
        }
        url
    }

    /// Health endpoint, which lives beside the API mount
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = format!("{}/health", self.base_url);
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(server_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self, state: &BrowseState) -> Result<ListResponse, ApiError> {
        self.get_json(&self.users_url(state)).await
    }
}

fn server_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(envelope) => envelope.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };
    ApiError::Server { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_service::directory::SortField;

    fn source() -> HttpListingSource {
        HttpListingSource::new("http://localhost:3001/api/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_users_url_without_sort() {
        let state = BrowseState::new(2, 25, None).unwrap();
        assert_eq!(
            source().users_url(&state),
            "http://localhost:3001/api/users?page=2&size=25"
        );
    }

    #[test]
    fn test_users_url_with_sort() {
        let state = BrowseState::new(1, 10, Some(SortField::Id)).unwrap();
        assert_eq!(
            source().users_url(&state),
            "http://localhost:3001/api/users?page=1&size=10&sort=id"
        );
    }

    #[test]
    fn test_server_error_uses_envelope_message() {
        let body = br#"{"status":"error","code":"VALIDATION_ERROR","message":"Invalid page parameter","timestamp":"2024-01-01T00:00:00Z"}"#;
        let err = server_error(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            err.to_string(),
            "Server returned 422 Unprocessable Entity: Invalid page parameter"
        );
    }

    #[test]
    fn test_server_error_without_envelope() {
        let err = server_error(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
