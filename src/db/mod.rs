//! Database layer for insta-dl
//!
//! Handles SQLite persistence of download records.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by concern:
//! - [`migrations`] - Database lifecycle, schema migrations
//! - [`records`] - Download record create/read/update

use crate::types::{DownloadRecord, RecordId, Status};
use chrono::{TimeZone, Utc};
use sqlx::{FromRow, sqlite::SqlitePool};
use std::path::PathBuf;

mod migrations;
mod records;

/// New download record to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// URL as submitted by the client
    pub source_url: String,
    /// Shortcode extracted from the URL
    pub shortcode: String,
}

/// Download record row (raw from SQLite)
#[derive(Debug, Clone, FromRow)]
pub struct RecordRow {
    /// Unique database ID
    pub id: i64,
    /// URL as submitted by the client
    pub source_url: String,
    /// Shortcode extracted from the URL
    pub shortcode: String,
    /// Unix timestamp when the record was created
    pub created_at: i64,
    /// Relative file path, set on completion
    pub file_path: Option<String>,
    /// Status text: pending, completed or failed
    pub status: String,
}

impl From<RecordRow> for DownloadRecord {
    fn from(row: RecordRow) -> Self {
        DownloadRecord {
            id: RecordId(row.id),
            source_url: row.source_url,
            shortcode: row.shortcode,
            created_at: Utc
                .timestamp_opt(row.created_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
            file_path: row.file_path.map(PathBuf::from),
            status: Status::from_db(&row.status),
        }
    }
}

/// Database handle for insta-dl
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
