//! The download operation: validate, record, fetch, settle.

use crate::db::NewRecord;
use crate::error::{Error, FetchError, Result};
use crate::shortcode::{extract_shortcode, validate_post_url};
use crate::types::{CompletedDownload, RecordId};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinError;

use super::{VideoDownloader, video_url};

impl VideoDownloader {
    /// Download the video behind `raw_url`
    ///
    /// Blank URLs fail with [`Error::Validation`] before any record exists.
    /// Otherwise a `pending` record is created and always ends `completed`
    /// or `failed`:
    ///
    /// - the fetcher returns a path: `completed`, with the file URL returned
    /// - the fetcher returns nothing: `failed`, [`FetchError::Unavailable`]
    /// - the fetcher errors, panics or times out: `failed`,
    ///   [`FetchError::Failed`] or [`FetchError::TimedOut`]
    ///
    /// Fetching and settling run on a spawned task, so dropping the returned
    /// future (a client hanging up) does not leave the record `pending`.
    pub async fn download(&self, raw_url: &str) -> Result<CompletedDownload> {
        let source_url = validate_post_url(raw_url)?.to_string();
        let shortcode = extract_shortcode(&source_url);

        let id = self
            .db
            .insert_record(&NewRecord {
                source_url: source_url.clone(),
                shortcode: shortcode.clone(),
            })
            .await?;

        tracing::info!(
            record_id = %id,
            url = %source_url,
            shortcode = %shortcode,
            "Download started"
        );

        let downloader = self.clone();
        let worker =
            tokio::spawn(async move { downloader.fetch_and_settle(id, source_url).await });

        match worker.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(record_id = %id, error = %e, "Download task aborted");
                self.settle_failed(id).await;
                Err(join_failure(id, e).into())
            }
        }
    }

    async fn fetch_and_settle(&self, id: RecordId, source_url: String) -> Result<CompletedDownload> {
        let fetched = match self.fetch(id, source_url.clone()).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(record_id = %id, error = %e, "Fetcher failed");
                self.settle_failed(id).await;
                return Err(e.into());
            }
        };

        let Some(file_path) = fetched.filter(|path| !path.as_os_str().is_empty()) else {
            tracing::warn!(record_id = %id, url = %source_url, "Fetcher returned no video");
            self.settle_failed(id).await;
            return Err(FetchError::Unavailable { id }.into());
        };

        if let Err(e) = self.db.mark_completed(id, &file_path).await {
            tracing::error!(record_id = %id, error = %e, "Failed to mark record completed");
            self.settle_failed(id).await;
            return Err(e);
        }

        let video_url = video_url(&file_path);
        tracing::info!(
            record_id = %id,
            file_path = %file_path.display(),
            video_url = %video_url,
            "Download completed"
        );

        Ok(CompletedDownload {
            id,
            file_path,
            video_url,
        })
    }

    /// Run the fetcher on its own task, bounded by the configured timeout if any
    ///
    /// A panic inside the fetcher surfaces as [`FetchError::Failed`]. On
    /// timeout the task is aborted, which drops the fetcher future (and kills
    /// a spawned yt-dlp).
    async fn fetch(
        &self,
        id: RecordId,
        url: String,
    ) -> std::result::Result<Option<PathBuf>, FetchError> {
        let fetcher = Arc::clone(&self.fetcher);
        let dest_dir = self.config.download_dir().clone();
        let mut task = tokio::spawn(async move { fetcher.fetch(&url, &dest_dir).await });

        let joined = match self.config.fetcher.timeout {
            Some(after) => match tokio::time::timeout(after, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    return Err(FetchError::TimedOut { id, after });
                }
            },
            None => task.await,
        };

        match joined {
            Ok(result) => result.map_err(|e: Error| FetchError::Failed {
                id,
                reason: e.to_string(),
            }),
            Err(e) => Err(join_failure(id, e)),
        }
    }

    // The caller's error is what the client sees; a failure here is only logged.
    async fn settle_failed(&self, id: RecordId) {
        if let Err(e) = self.db.mark_failed(id).await {
            tracing::error!(record_id = %id, error = %e, "Failed to mark record failed");
        }
    }
}

fn join_failure(id: RecordId, e: JoinError) -> FetchError {
    let reason = if e.is_panic() {
        "fetcher panicked".to_string()
    } else {
        format!("fetcher task cancelled: {e}")
    };
    FetchError::Failed { id, reason }
}
