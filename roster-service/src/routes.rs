//! Route table

use axum::{middleware, routing::get, Router};

use crate::{
    handlers::{index, list_users, not_found},
    health::{health, readiness},
    middleware::ListingRateLimit,
    state::AppState,
};

/// Prefixes the API is mounted under; the versioned one is primary
pub const API_PREFIXES: [&str; 2] = ["/api/v1", "/api"];

/// Routes served under each API prefix
fn api_router(rate_limit: Option<ListingRateLimit>) -> Router<AppState> {
    let mut users = Router::new().route("/users", get(list_users));
    if let Some(limit) = rate_limit {
        users = users.route_layer(middleware::from_fn_with_state(
            limit,
            ListingRateLimit::middleware,
        ));
    }

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(users)
}

/// Build the application router without transport middleware
///
/// Both prefixes share one limiter so a client cannot double its quota by
/// alternating between them.
pub fn build_router(state: AppState) -> Router {
    let rate_limit = ListingRateLimit::from_config(state.config());
    if let Some(ref limit) = rate_limit {
        tracing::info!(
            max_requests = limit.max_requests(),
            window_secs = limit.window().as_secs(),
            "Listing rate limit enabled"
        );
    }

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness));

    for prefix in API_PREFIXES {
        // nest() only matches the bare prefix; serve the index with a trailing slash too
        app = app
            .route(&format!("{prefix}/"), get(index))
            .nest(prefix, api_router(rate_limit.clone()));
    }

    #[cfg(feature = "openapi")]
    {
        app = app.merge(crate::openapi::swagger_ui());
    }

    app.fallback(not_found).with_state(state)
}
