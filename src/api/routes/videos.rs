//! Video file handler.

use crate::api::AppState;
use crate::error::ApiError;
use crate::files::open_video;
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /video/*filename - Stream a downloaded file
#[utoipa::path(
    get,
    path = "/video/{filename}",
    tag = "videos",
    params(
        ("filename" = String, Path, description = "File path relative to the download directory")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "Video not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn serve_video(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    let video = match open_video(state.downloader.config().download_dir(), &filename).await {
        Ok(Some(video)) => video,
        Ok(None) => {
            tracing::debug!(filename = %filename, "Video not found");
            return (StatusCode::NOT_FOUND, Json(ApiError::video_not_found())).into_response();
        }
        Err(e) => return e.into_response(),
    };

    tracing::debug!(
        path = %video.path.display(),
        bytes = video.len,
        content_type = video.content_type,
        "Serving video"
    );

    let body = Body::from_stream(ReaderStream::new(video.file));

    (
        [
            (header::CONTENT_TYPE, video.content_type.to_string()),
            (header::CONTENT_LENGTH, video.len.to_string()),
        ],
        body,
    )
        .into_response()
}
