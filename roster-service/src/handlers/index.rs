//! API index and fallback

use axum::{extract::OriginalUri, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, RequestError},
    ids::request_id_from,
};

/// Body of `GET {prefix}/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IndexResponse {
    /// Liveness message
    pub message: String,
}

/// Confirms the API is mounted
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "API is running".to_string(),
    })
}

/// 404 for anything no route matched
pub async fn not_found(OriginalUri(uri): OriginalUri, headers: HeaderMap) -> RequestError {
    Error::NotFound(uri.path().to_string()).with_request_id(request_id_from(&headers))
}
