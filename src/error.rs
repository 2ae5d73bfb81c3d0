//! Error types for insta-dl
//!
//! This module provides error handling for the service, including:
//! - Domain-specific error types (Database, Fetch)
//! - HTTP status code mapping for API integration
//! - The public JSON error body returned to clients

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::RecordId;

/// Result type alias for insta-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to clients when the submitted URL is missing or unusable
pub const INVALID_URL_MESSAGE: &str = "Please provide a valid Instagram URL";

/// Message shown to clients when the fetcher produced no file
pub const UNAVAILABLE_MESSAGE: &str =
    "Failed to download video. Please check if the URL is correct and the video is public.";

/// Message shown to clients for any internal failure
pub const INTERNAL_MESSAGE: &str = "An error occurred while processing your request";

/// Message shown to clients when a requested video file does not exist
pub const VIDEO_NOT_FOUND_MESSAGE: &str = "Video not found";

/// Main error type for insta-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "INSTA_DL_BIND")
        key: Option<String>,
    },

    /// Client input failed validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Video retrieval failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Index page rendering failed
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// External tool execution failed (yt-dlp, etc.)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A status update was attempted on a record that already left `pending`
    #[error("record {id} cannot move to {target}: it is no longer pending")]
    InvalidTransition {
        /// The record whose status update was rejected
        id: RecordId,
        /// The status that was requested
        target: String,
    },
}

/// Errors produced while retrieving a video through the fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher completed but produced no file (private post, bad URL)
    #[error("no video retrieved for record {id}")]
    Unavailable {
        /// The record that was marked failed
        id: RecordId,
    },

    /// The fetcher itself raised an error
    #[error("fetcher failed for record {id}: {reason}")]
    Failed {
        /// The record that was marked failed
        id: RecordId,
        /// Underlying cause
        reason: String,
    },

    /// The fetcher did not finish within the configured timeout
    #[error("fetcher timed out after {after:?} for record {id}")]
    TimedOut {
        /// The record that was marked failed
        id: RecordId,
        /// The configured timeout
        after: Duration,
    },
}

/// JSON error body returned by the API
///
/// The download endpoint answers with `{"success": false, "error": "..."}`;
/// the video endpoint answers with `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always `false` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Human-readable error message, suitable for end users
    pub error: String,
}

impl ApiError {
    /// Error body for a failed operation: `{"success": false, "error": ...}`
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: message.into(),
        }
    }

    /// Error body without the `success` flag: `{"error": ...}`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: message.into(),
        }
    }

    /// Body for an unknown video file
    pub fn video_not_found() -> Self {
        Self::message(VIDEO_NOT_FOUND_MESSAGE)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the client can fix the input
            Error::Validation(_) => 400,
            Error::Fetch(FetchError::Unavailable { .. }) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 501 Not Implemented - no fetcher available
            Error::NotSupported(_) => 501,

            // 500 Internal Server Error - everything else
            Error::Fetch(FetchError::Failed { .. }) => 500,
            Error::Fetch(FetchError::TimedOut { .. }) => 500,
            Error::Config { .. } => 500,
            Error::Database(_) => 500,
            Error::Io(_) => 500,
            Error::Template(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::ExternalTool(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Database(DatabaseError::InvalidTransition { .. }) => "invalid_transition",
            Error::Database(_) => "database_error",
            Error::Fetch(e) => match e {
                FetchError::Unavailable { .. } => "video_unavailable",
                FetchError::Failed { .. } => "fetch_failed",
                FetchError::TimedOut { .. } => "fetch_timed_out",
            },
            Error::Io(_) => "io_error",
            Error::NotFound(_) => "not_found",
            Error::Template(_) => "template_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::NotSupported(_) => "not_supported",
        }
    }
}

impl Error {
    /// Whether the client caused the error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Message shown to the client for this error
    ///
    /// Internal failures collapse to a single opaque message; the detailed
    /// cause only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(_) => INVALID_URL_MESSAGE.to_string(),
            Error::Fetch(FetchError::Unavailable { .. }) => UNAVAILABLE_MESSAGE.to_string(),
            Error::NotFound(what) => format!("{what} not found"),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::NotFound(_) => ApiError::message(error.public_message()),
            _ => ApiError::failure(error.public_message()),
        }
    }
}
