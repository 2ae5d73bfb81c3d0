//! Index page, unknown routes and panics.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, context};
use std::any::Any;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Inline message shown for unknown routes
pub const PAGE_NOT_FOUND_MESSAGE: &str = "Page not found";

/// Inline message shown when a handler panicked
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Render the index page, optionally with an inline error message
///
/// The message is HTML-escaped.
pub fn render_index(error: Option<&str>) -> crate::Result<String> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    let page = env.get_template("index.html")?.render(context! { error })?;
    Ok(page)
}

fn index_response(status: StatusCode, error: Option<&str>) -> Response {
    match render_index(error) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render index page");
            (status, error.unwrap_or(INTERNAL_ERROR_MESSAGE).to_string()).into_response()
        }
    }
}

/// GET / - Index page with the download form
#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses(
        (status = 200, description = "HTML page with the download form", content_type = "text/html")
    )
)]
pub async fn index() -> Response {
    index_response(StatusCode::OK, None)
}

/// Fallback for unknown routes: the index page with "Page not found"
pub async fn not_found() -> Response {
    index_response(StatusCode::NOT_FOUND, Some(PAGE_NOT_FOUND_MESSAGE))
}

/// Response for a panicking handler (used with `CatchPanicLayer::custom`)
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "Handler panicked");

    index_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(INTERNAL_ERROR_MESSAGE),
    )
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_error() {
        let page = render_index(None).unwrap();
        assert!(page.contains("<form id=\"download-form\""));
        assert!(!page.contains("role=\"alert\""));
    }

    #[test]
    fn test_render_escapes_error() {
        let page = render_index(Some("<script>alert(1)</script>")).unwrap();
        assert!(page.contains("role=\"alert\""));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_panic_response_is_500_with_message() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
