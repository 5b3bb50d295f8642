//! OpenAPI document and Swagger UI
//!
//! The document is served at `/api-docs/openapi.json` and browsable at
//! `/api-docs`.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    directory::{PagingLinks, Record, SortField},
    error::ErrorResponse,
    handlers::{IndexResponse, ListResponse},
    health::{HealthResponse, ReadinessResponse, Uptime},
};

/// Where the raw document is served
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Where the Swagger UI is served
pub const SWAGGER_UI_PATH: &str = "/api-docs";

/// API description
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        description = "Paginated, sortable directory listing. The API is also mounted under `/api` for unversioned clients."
    ),
    paths(crate::handlers::users::list_users, crate::health::health),
    components(schemas(
        Record,
        PagingLinks,
        ListResponse,
        SortField,
        ErrorResponse,
        IndexResponse,
        HealthResponse,
        ReadinessResponse,
        Uptime
    )),
    tags(
        (name = "Users", description = "Directory listing"),
        (name = "Health", description = "Liveness and uptime")
    )
)]
pub struct ApiDoc;

/// Swagger UI router carrying [`ApiDoc`]
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}
