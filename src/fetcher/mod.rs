//! Video retrieval through an external downloader
//!
//! The core abstraction is the [`VideoFetcher`] trait. Implementations:
//!
//! - [`CliVideoFetcher`]: runs an external binary (yt-dlp by default)
//! - [`NoOpVideoFetcher`]: stub used when no binary is available
//!
//! [`select_fetcher`] picks one from the configuration.

mod cli;
mod noop;
mod traits;

pub use cli::CliVideoFetcher;
pub use noop::NoOpVideoFetcher;
pub use traits::VideoFetcher;

use crate::config::FetcherConfig;
use std::sync::Arc;

/// Build the fetcher described by `config`
///
/// An explicit binary path wins; otherwise PATH is searched when allowed;
/// otherwise the no-op fetcher is used.
pub fn select_fetcher(config: &FetcherConfig) -> Arc<dyn VideoFetcher> {
    let fetcher: Arc<dyn VideoFetcher> = if let Some(ref binary_path) = config.binary_path {
        Arc::new(
            CliVideoFetcher::new(binary_path.clone()).with_extra_args(config.extra_args.clone()),
        )
    } else if config.search_path {
        CliVideoFetcher::from_path()
            .map(|f| {
                Arc::new(f.with_extra_args(config.extra_args.clone())) as Arc<dyn VideoFetcher>
            })
            .unwrap_or_else(|| Arc::new(NoOpVideoFetcher))
    } else {
        Arc::new(NoOpVideoFetcher)
    };

    tracing::info!(fetcher = fetcher.name(), "Video fetcher initialized");

    fetcher
}
