//! # roster-service
//!
//! A paginated, sortable directory listing over HTTP.
//!
//! A fixed collection of `{ id, name }` records is loaded once at startup and
//! served from `GET /api/v1/users` (also mounted at `/api/users`). Callers pick
//! a `page`, a `size` between 1 and 100 and an optional `sort` of `name` or
//! `id`; responses carry the page plus previous/next links.
//!
//! ## Example
//!
//! ```rust,no_run
//! use roster_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::from_config(config.clone())?;
//!     let app = build_router(state);
//!
//!     Server::new(config).serve(app).await
//! }
//! ```
//!
//! The listing engine itself has no HTTP dependency:
//!
//! ```rust
//! use roster_service::directory::{list, RawListingParams, Record};
//!
//! let records = vec![Record::new(1, "Mike"), Record::new(0, "Jorn")];
//! let query = RawListingParams::from_query_string("sort=name&size=1")
//!     .validate()
//!     .unwrap();
//!
//! let page = list(&records, &query);
//! assert_eq!(page.items[0].name, "Jorn");
//! assert_eq!(page.total_results, 2);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(feature = "openapi")]
pub mod openapi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::directory::{
        Directory, ListingError, ListingQuery, PagingLinks, RawListingParams, Record, SortField,
    };
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::handlers::ListResponse;
    pub use crate::ids::RequestId;
    pub use crate::observability::init_tracing;
    pub use crate::routes::build_router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
