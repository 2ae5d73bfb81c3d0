//! Download handlers.

use crate::api::AppState;
use crate::error::Error;
use crate::types::{DownloadRecord, DownloadResponse, RecordId};
use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
};
use serde::{Deserialize, Serialize};

/// Form body for POST /download
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadForm {
    /// Instagram post or reel URL
    #[serde(default)]
    pub url: Option<String>,
}

/// POST /download - Download the video behind an Instagram URL
#[utoipa::path(
    post,
    path = "/download",
    tag = "downloads",
    request_body(content = DownloadForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Video downloaded", body = DownloadResponse),
        (status = 400, description = "Missing URL, or no video could be retrieved", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn download_video(
    State(state): State<AppState>,
    form: Result<Form<DownloadForm>, FormRejection>,
) -> Result<Json<DownloadResponse>, Error> {
    let url = match form {
        Ok(Form(form)) => form.url.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable download form");
            String::new()
        }
    };

    let done = state.downloader.download(&url).await?;

    Ok(Json(done.into()))
}

/// GET /downloads/:id - Get a stored download record
#[utoipa::path(
    get,
    path = "/downloads/{id}",
    tag = "downloads",
    params(
        ("id" = i64, Path, description = "Download record ID")
    ),
    responses(
        (status = 200, description = "Download record", body = DownloadRecord),
        (status = 404, description = "Download not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn get_download(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DownloadRecord>, Error> {
    let record = state.downloader.record(RecordId(id)).await?;
    Ok(Json(record))
}
