//! `GET {prefix}/users`

use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    directory::{self, links, PagingLinks, RawListingParams, Record},
    error::{Error, RequestError},
    ids::request_id_from,
    state::AppState,
};

/// Body of a successful listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListResponse {
    /// Records on the requested page
    pub data: Vec<Record>,

    /// Totals and neighbouring page links
    pub paging: PagingLinks,
}

/// List one page of records
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(RawListingParams),
    responses(
        (status = 200, description = "Page of records", body = ListResponse),
        (status = 422, description = "Invalid page, size or sort", body = crate::error::ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse),
    )
))]
pub async fn list_users(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Json<ListResponse>, RequestError> {
    let request_id = request_id_from(&headers);
    tracing::info!(request_id = ?request_id, query = ?uri.query(), "Listing request received");

    let query = RawListingParams::from_query_string(uri.query().unwrap_or_default())
        .validate()
        .map_err(|err| Error::from(err).with_request_id(request_id.clone()))?;

    let result = directory::list(state.directory().records(), &query);

    let base_url = base_url(&state, &headers, uri.path());
    let paging = links::build(&query, result.total_results, &base_url)
        .map_err(|err| Error::from(err).with_request_id(request_id.clone()))?;

    tracing::info!(
        request_id = ?request_id,
        returned = result.items.len(),
        total = result.total_results,
        page = query.page(),
        size = query.size(),
        "Listing completed"
    );

    Ok(Json(ListResponse {
        data: result.items,
        paging,
    }))
}

/// `scheme://host/path` of the current request, without its query
///
/// Honors `X-Forwarded-Proto` from a terminating proxy and falls back to the
/// configured bind address when no `Host` header was sent.
fn base_url(state: &AppState, headers: &HeaderMap, path: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            let service = &state.config().service;
            format!("{}:{}", service.host, service.port)
        });

    format!("{scheme}://{host}{path}")
}
