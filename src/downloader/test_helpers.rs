//! Shared test helpers for creating VideoDownloader instances in tests.

use crate::config::Config;
use crate::db::Database;
use crate::downloader::VideoDownloader;
use crate::fetcher::VideoFetcher;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

/// Bytes written by [`Script::Writes`]
pub(crate) const FAKE_VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 fake video";

/// What a [`ScriptedFetcher`] does when called
#[derive(Clone, Debug)]
pub(crate) enum Script {
    /// Write [`FAKE_VIDEO_BYTES`] to `<dest>/<name>` and return `name`
    Writes(&'static str),
    /// Sleep, then behave like [`Script::Writes`]
    WritesAfter(Duration, &'static str),
    /// Return an empty result
    Empty,
    /// Return an error
    Fails,
    /// Never finish in test time
    Hangs,
    /// Panic inside the fetcher
    Panics,
}

/// In-memory fetcher that follows a fixed script and counts its calls
pub(crate) struct ScriptedFetcher {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoFetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str, dest_dir: &Path) -> crate::Result<Option<PathBuf>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.script {
            Script::Writes(name) => write_fake_video(dest_dir, name).await,
            Script::WritesAfter(delay, name) => {
                tokio::time::sleep(*delay).await;
                write_fake_video(dest_dir, name).await
            }
            Script::Empty => Ok(None),
            Script::Fails => Err(crate::Error::ExternalTool("scripted failure".into())),
            Script::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
            Script::Panics => panic!("scripted panic"),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

async fn write_fake_video(dest_dir: &Path, name: &str) -> crate::Result<Option<PathBuf>> {
    let path = dest_dir.join(name);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, FAKE_VIDEO_BYTES).await?;
    Ok(Some(PathBuf::from(name)))
}

/// Wait until no record is `pending`, giving up after a few seconds
pub(crate) async fn wait_until_settled(downloader: &VideoDownloader) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let pending = downloader
            .db
            .count_records(Some(crate::types::Status::Pending))
            .await
            .unwrap();
        if pending == 0 {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "{pending} record(s) still pending"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Config pointing every path into `root`
pub(crate) fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.persistence.database_url = format!("sqlite:{}", root.join("test.db").display());
    config.download.download_dir = root.join("downloads");
    config.fetcher.search_path = false;
    config
}

/// Create a downloader backed by a temp database and download directory.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    fetcher: Arc<dyn VideoFetcher>,
) -> (VideoDownloader, tempfile::TempDir) {
    create_test_downloader_with(fetcher, |_| {}).await
}

/// Same as [`create_test_downloader`], letting the caller adjust the config
pub(crate) async fn create_test_downloader_with(
    fetcher: Arc<dyn VideoFetcher>,
    adjust: impl FnOnce(&mut Config),
) -> (VideoDownloader, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = test_config(temp_dir.path());
    adjust(&mut config);

    let db = Database::connect(&config.persistence.database_url)
        .await
        .unwrap();
    let downloader = VideoDownloader::with_parts(db, fetcher, config)
        .await
        .unwrap();

    (downloader, temp_dir)
}
