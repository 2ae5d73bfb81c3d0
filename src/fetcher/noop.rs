//! No-op fetcher for graceful degradation

use super::traits::VideoFetcher;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Fetcher used when no external binary is available or configured
///
/// Every call returns `Error::NotSupported`. The service keeps running, and
/// each download request fails with a server error and a `failed` record.
///
/// # Examples
///
/// ```
/// use insta_dl::fetcher::{NoOpVideoFetcher, VideoFetcher};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let fetcher = NoOpVideoFetcher;
/// let result = fetcher
///     .fetch("https://www.instagram.com/p/ABC123/", Path::new("downloads"))
///     .await;
/// assert!(result.is_err());
/// # }
/// ```
pub struct NoOpVideoFetcher;

#[async_trait]
impl VideoFetcher for NoOpVideoFetcher {
    async fn fetch(&self, _url: &str, _dest_dir: &Path) -> crate::Result<Option<PathBuf>> {
        Err(crate::Error::NotSupported(
            "Video download requires an external fetcher binary. \
             Set INSTA_DL_FETCHER or ensure yt-dlp is in PATH."
                .into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
