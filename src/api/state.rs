//! Application state for the API server

use crate::VideoDownloader;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone). Handlers read the download
/// directory from the downloader's own config, so files are served from the
/// same place they were written to.
#[derive(Clone)]
pub struct AppState {
    /// The downloader handling `POST /download`
    pub downloader: Arc<VideoDownloader>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(downloader: Arc<VideoDownloader>) -> Self {
        Self { downloader }
    }
}
