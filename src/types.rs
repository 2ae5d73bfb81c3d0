//! Core types for insta-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// Unique identifier for a download record
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl sqlx::Type<sqlx::Sqlite> for RecordId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for RecordId {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for RecordId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(id))
    }
}

/// Lifecycle of a download record
///
/// A record starts `Pending` and moves exactly once to `Completed` or `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Created, fetcher not finished yet
    Pending,
    /// File retrieved and stored
    Completed,
    /// Fetcher produced nothing or raised an error
    Failed,
}

impl Status {
    /// Text stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
            Status::Failed => "failed",
        }
    }

    /// Parse the `status` column, treating unknown values as failed
    pub fn from_db(status: &str) -> Self {
        match status {
            "pending" => Status::Pending,
            "completed" => Status::Completed,
            _ => Status::Failed,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted download attempt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DownloadRecord {
    /// Record ID
    pub id: RecordId,
    /// URL as submitted by the client
    pub source_url: String,
    /// Last non-empty path segment of the URL
    pub shortcode: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// File location relative to the download directory, once completed
    #[schema(value_type = Option<String>)]
    pub file_path: Option<PathBuf>,
    /// Current status
    pub status: Status,
}

/// Result of a successful download
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedDownload {
    /// The record that was marked completed
    pub id: RecordId,
    /// File location relative to the download directory
    pub file_path: PathBuf,
    /// Public URL under which the file is served
    pub video_url: String,
}

/// JSON body returned by `POST /download` on success
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadResponse {
    /// Always `true`
    pub success: bool,
    /// Human-readable confirmation
    pub message: String,
    /// URL under which the downloaded file can be fetched
    pub video_url: String,
}

impl From<CompletedDownload> for DownloadResponse {
    fn from(done: CompletedDownload) -> Self {
        Self {
            success: true,
            message: "Video downloaded successfully".to_string(),
            video_url: done.video_url,
        }
    }
}
