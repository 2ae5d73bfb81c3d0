//! Startup and shutdown coordination.

use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::fetcher::{VideoFetcher, select_fetcher};
use std::sync::Arc;

use super::VideoDownloader;

impl VideoDownloader {
    /// Create a downloader from configuration
    ///
    /// Connects to the database (running migrations), creates the download
    /// directory and selects a fetcher according to `config.fetcher`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the download
    /// directory cannot be created.
    pub async fn new(config: Config) -> Result<Self> {
        let db = Database::connect(&config.persistence.database_url).await?;
        let fetcher = select_fetcher(&config.fetcher);

        Self::with_parts(db, fetcher, config).await
    }

    /// Create a downloader from an already opened database and a fetcher
    ///
    /// Used by tests and embedders that supply their own [`VideoFetcher`].
    pub async fn with_parts(
        db: Database,
        fetcher: Arc<dyn VideoFetcher>,
        config: Config,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(config.download_dir()).await?;

        tracing::info!(
            download_dir = %config.download_dir().display(),
            fetcher = fetcher.name(),
            "Downloader ready"
        );

        Ok(Self {
            db,
            fetcher,
            config: Arc::new(config),
        })
    }

    /// Close the database pool
    ///
    /// In-flight requests holding a clone of the downloader see query errors
    /// afterwards.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down downloader");
        self.db.clone().close().await;
        tracing::info!("Database connections closed");
    }
}
