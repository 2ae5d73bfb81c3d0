//! Download record CRUD operations.

use crate::error::DatabaseError;
use crate::types::{DownloadRecord, RecordId, Status};
use crate::{Error, Result};
use std::path::Path;

use super::{Database, NewRecord, RecordRow};

impl Database {
    /// Insert a new record in `pending` state
    pub async fn insert_record(&self, record: &NewRecord) -> Result<RecordId> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO downloads (source_url, shortcode, created_at, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.source_url)
        .bind(&record.shortcode)
        .bind(now)
        .bind(Status::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert record: {}",
                e
            )))
        })?;

        Ok(RecordId(result.last_insert_rowid()))
    }

    /// Get a record by ID
    pub async fn get_record(&self, id: RecordId) -> Result<Option<DownloadRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, source_url, shortcode, created_at, file_path, status
            FROM downloads
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get record: {}",
                e
            )))
        })?;

        Ok(row.map(DownloadRecord::from))
    }

    /// Mark a pending record as completed and store its file path
    pub async fn mark_completed(&self, id: RecordId, file_path: &Path) -> Result<()> {
        let result = sqlx::query(
            "UPDATE downloads SET status = ?, file_path = ? WHERE id = ? AND status = ?",
        )
        .bind(Status::Completed.as_str())
        .bind(file_path.to_string_lossy().into_owned())
        .bind(id)
        .bind(Status::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to mark record completed: {}",
                e
            )))
        })?;

        ensure_transitioned(id, Status::Completed, result.rows_affected())
    }

    /// Mark a pending record as failed
    pub async fn mark_failed(&self, id: RecordId) -> Result<()> {
        let result = sqlx::query("UPDATE downloads SET status = ? WHERE id = ? AND status = ?")
            .bind(Status::Failed.as_str())
            .bind(id)
            .bind(Status::Pending.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to mark record failed: {}",
                    e
                )))
            })?;

        ensure_transitioned(id, Status::Failed, result.rows_affected())
    }

    /// Count records, optionally restricted to one status
    pub async fn count_records(&self, status: Option<Status>) -> Result<i64> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM downloads WHERE status = ?")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM downloads")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to count records: {}",
                e
            )))
        })?;

        Ok(count)
    }
}

// Zero rows means the record is missing or already left `pending`.
fn ensure_transitioned(id: RecordId, target: Status, rows_affected: u64) -> Result<()> {
    if rows_affected == 0 {
        return Err(Error::Database(DatabaseError::InvalidTransition {
            id,
            target: target.to_string(),
        }));
    }
    Ok(())
}
