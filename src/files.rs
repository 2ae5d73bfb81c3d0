//! Serving downloaded files from the download directory.

use crate::Result;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// An opened file ready to be streamed
#[derive(Debug)]
pub struct VideoFile {
    /// Open handle positioned at the start of the file
    pub file: tokio::fs::File,
    /// Canonical location on disk
    pub path: PathBuf,
    /// Size in bytes
    pub len: u64,
    /// MIME type derived from the extension
    pub content_type: &'static str,
}

/// Reduce a requested name to plain path components
///
/// Returns `None` for names containing `..`, a root or a prefix, and for
/// names that are empty once `.` components are dropped.
pub fn sanitize_relative(requested: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(requested).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (!clean.as_os_str().is_empty()).then_some(clean)
}

/// Resolve `requested` to an existing path inside `download_dir`
///
/// Symlinks are followed; a target outside the canonical download directory
/// is treated as missing.
pub async fn resolve_video_path(download_dir: &Path, requested: &str) -> Option<PathBuf> {
    let relative = sanitize_relative(requested)?;
    let root = tokio::fs::canonicalize(download_dir).await.ok()?;
    let candidate = tokio::fs::canonicalize(root.join(relative)).await.ok()?;

    if !candidate.starts_with(&root) {
        tracing::warn!(
            requested = %requested,
            resolved = %candidate.display(),
            "Rejected video path outside the download directory"
        );
        return None;
    }

    Some(candidate)
}

/// Open `requested` for streaming
///
/// `Ok(None)` means the file does not exist (or is not a regular file inside
/// the download directory). Other I/O failures are returned as errors.
pub async fn open_video(download_dir: &Path, requested: &str) -> Result<Option<VideoFile>> {
    let Some(path) = resolve_video_path(download_dir, requested).await else {
        return Ok(None);
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Ok(None);
    }

    Ok(Some(VideoFile {
        content_type: content_type_for(&path),
        len: metadata.len(),
        file,
        path,
    }))
}

/// MIME type for a downloaded file, by extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
