//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the insta-dl HTTP API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the insta-dl HTTP API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "insta-dl HTTP API",
        version = "0.1.0",
        description = "Download Instagram videos through an external fetcher and serve them back",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Pages
        crate::api::routes::index,

        // Downloads
        crate::api::routes::download_video,
        crate::api::routes::get_download,

        // Videos
        crate::api::routes::serve_video,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::RecordId,
        crate::types::Status,
        crate::types::DownloadRecord,
        crate::types::DownloadResponse,
        crate::api::routes::DownloadForm,
        crate::error::ApiError,
    )),
    tags(
        (name = "pages", description = "HTML pages"),
        (name = "downloads", description = "Submit Instagram URLs and inspect download records"),
        (name = "videos", description = "Serve downloaded files"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
