//! Download orchestration.
//!
//! [`VideoDownloader`] ties the record store, the fetcher and the
//! configuration together. Its methods are split by concern:
//! - [`download`] - URL validation, record lifecycle and fetcher invocation
//! - [`lifecycle`] - Construction and shutdown

mod download;
mod lifecycle;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::fetcher::VideoFetcher;
use crate::types::{DownloadRecord, RecordId};
use std::path::{Component, Path};
use std::sync::Arc;

/// Prefix under which downloaded files are served
pub const VIDEO_ROUTE_PREFIX: &str = "/video/";

/// Main downloader instance (cloneable - all fields are cheap to clone)
#[derive(Clone)]
pub struct VideoDownloader {
    /// Database handle for persistence
    /// Public for integration tests to query record status
    pub db: Database,
    /// Fetcher used to retrieve videos (trait object for pluggable implementations)
    pub(crate) fetcher: Arc<dyn VideoFetcher>,
    /// Configuration (wrapped in Arc for sharing across handlers)
    pub(crate) config: Arc<Config>,
}

impl VideoDownloader {
    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the active fetcher ("cli", "noop", ...)
    pub fn fetcher_name(&self) -> &'static str {
        self.fetcher.name()
    }

    /// Look up a record, reporting a missing one as [`Error::NotFound`]
    pub async fn record(&self, id: RecordId) -> Result<DownloadRecord> {
        self.db
            .get_record(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Download {id}")))
    }
}

/// Public URL for a file stored at `relative` inside the download directory
///
/// Each path segment is percent-encoded separately so that `/` keeps
/// separating directories. Non-plain components are dropped.
pub fn video_url(relative: &Path) -> String {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => {
                Some(urlencoding::encode(&segment.to_string_lossy()).into_owned())
            }
            _ => None,
        })
        .collect();

    format!("{VIDEO_ROUTE_PREFIX}{}", segments.join("/"))
}
