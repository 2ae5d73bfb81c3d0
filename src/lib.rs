//! # insta-dl
//!
//! Small web service that downloads Instagram videos through an external
//! fetcher (yt-dlp by default), records every attempt in SQLite and serves
//! the resulting files back over HTTP.
//!
//! ## Flow
//!
//! 1. `POST /download` receives a URL in the `url` form field.
//! 2. The shortcode (last non-empty path segment) is extracted and a
//!    `pending` [`DownloadRecord`] is stored.
//! 3. The [`VideoFetcher`] downloads into the configured directory.
//! 4. The record becomes `completed` or `failed`, and the client receives
//!    `{"success": true, "video_url": "/video/..."}` or an error body.
//! 5. `GET /video/<file>` streams the file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use insta_dl::{Config, VideoDownloader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let downloader = VideoDownloader::new(config.clone()).await?;
//!
//!     // One-off download without the HTTP server
//!     let done = downloader.download("https://www.instagram.com/p/ABC123/").await?;
//!     println!("served at {}", done.video_url);
//!
//!     // Or serve the HTTP API until SIGTERM/SIGINT
//!     insta_dl::api::start_api_server(Arc::new(downloader), Arc::new(config)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP API module
pub mod api;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// External video fetchers
pub mod fetcher;
/// Serving downloaded files
pub mod files;
/// Instagram URL validation and shortcode extraction
pub mod shortcode;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use downloader::VideoDownloader;
pub use error::{ApiError, DatabaseError, Error, FetchError, Result, ToHttpStatus};
pub use fetcher::{CliVideoFetcher, NoOpVideoFetcher, VideoFetcher};
pub use types::{CompletedDownload, DownloadRecord, DownloadResponse, RecordId, Status};

/// Resolve on SIGTERM or Ctrl+C (SIGINT); on non-Unix targets only Ctrl+C.
///
/// Used by [`api::start_api_server`] to trigger graceful shutdown. If a
/// handler cannot be installed that branch is skipped and the other one
/// still works.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_for_signal_resolves_on_sigterm() {
        let waiter = tokio::spawn(super::wait_for_signal());

        // Let the waiter install its handlers before the signal is sent
        tokio::time::sleep(Duration::from_millis(100)).await;
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("SIGTERM did not resolve wait_for_signal")
            .unwrap();
    }
}
