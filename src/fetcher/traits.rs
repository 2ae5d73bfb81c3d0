//! Trait for the external video fetcher

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for retrieving a post's video into a local directory
///
/// The fetcher is an opaque collaborator: it receives the submitted URL and
/// the destination directory and reports where the file ended up.
///
/// # Examples
///
/// ```no_run
/// use insta_dl::fetcher::{CliVideoFetcher, VideoFetcher};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = CliVideoFetcher::from_path().expect("yt-dlp not found");
///
/// match fetcher
///     .fetch("https://www.instagram.com/p/ABC123/", Path::new("static/downloads"))
///     .await?
/// {
///     Some(path) => println!("saved as {}", path.display()),
///     None => println!("nothing retrieved (private post?)"),
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait VideoFetcher: Send + Sync {
    /// Retrieve the video behind `url` into `dest_dir`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(path))` with the file location relative to `dest_dir`
    /// - `Ok(None)` when the fetcher ran but produced no file (invalid URL,
    ///   private content)
    ///
    /// # Errors
    ///
    /// Returns an error if the fetcher could not run at all (binary missing,
    /// I/O failure) or is not supported in this build.
    async fn fetch(&self, url: &str, dest_dir: &Path) -> crate::Result<Option<PathBuf>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
