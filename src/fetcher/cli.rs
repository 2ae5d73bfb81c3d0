//! CLI-based fetcher using an external downloader binary

use super::traits::VideoFetcher;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Default binary searched for in PATH
const DEFAULT_BINARY: &str = "yt-dlp";

/// Fetcher that shells out to a yt-dlp compatible binary
///
/// The binary is invoked as
/// `<binary> <extra args> --no-progress --no-playlist -o <dest>/%(id)s.%(ext)s
/// --print after_move:filepath -- <url>` and the last non-empty line of
/// stdout is taken as the path of the downloaded file.
///
/// # Examples
///
/// ```no_run
/// use insta_dl::fetcher::CliVideoFetcher;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let fetcher = CliVideoFetcher::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let fetcher = CliVideoFetcher::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct CliVideoFetcher {
    binary_path: PathBuf,
    extra_args: Vec<String>,
}

impl CliVideoFetcher {
    /// Create a new CLI fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            extra_args: Vec::new(),
        }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which(DEFAULT_BINARY).ok().map(Self::new)
    }

    /// Arguments inserted right after the binary (cookies, proxies, ...)
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Path of the binary this fetcher runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait]
impl VideoFetcher for CliVideoFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> crate::Result<Option<PathBuf>> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let template = dest_dir.join("%(id)s.%(ext)s");

        let output = Command::new(&self.binary_path)
            .args(&self.extra_args)
            .arg("--no-progress")
            .arg("--no-playlist")
            .arg("-o")
            .arg(&template)
            .arg("--print")
            .arg("after_move:filepath")
            .arg("--")
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                crate::Error::ExternalTool(format!(
                    "Failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                url = %url,
                status = %output.status,
                stderr = %last_line(&stderr).unwrap_or_default(),
                "Fetcher exited without a video"
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(printed) = last_line(&stdout) else {
            tracing::warn!(url = %url, "Fetcher succeeded but printed no file path");
            return Ok(None);
        };

        Ok(relative_to(dest_dir, Path::new(printed)))
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|line| !line.is_empty())
}

/// Express `printed` relative to `dest_dir`
///
/// Paths outside `dest_dir` fall back to their file name, since the file
/// server only looks inside the download directory.
fn relative_to(dest_dir: &Path, printed: &Path) -> Option<PathBuf> {
    let relative = match printed.strip_prefix(dest_dir) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) if printed.is_relative() && !printed.starts_with("..") => {
            // Already relative to the destination
            printed.to_path_buf()
        }
        Err(_) => PathBuf::from(printed.file_name()?),
    };

    (!relative.as_os_str().is_empty()).then_some(relative)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_matches_which() {
        let which_result = which::which(DEFAULT_BINARY);
        let from_path_result = CliVideoFetcher::from_path();

        match which_result {
            Ok(expected_path) => {
                let fetcher = from_path_result.expect("from_path should find the binary");
                assert_eq!(fetcher.binary_path(), expected_path.as_path());
            }
            Err(_) => assert!(from_path_result.is_none()),
        }
    }

    #[test]
    fn test_last_line_skips_blank_lines() {
        assert_eq!(last_line("a\nb\n\n  \n"), Some("b"));
        assert_eq!(last_line("\n\n"), None);
        assert_eq!(last_line(""), None);
    }

    #[test]
    fn test_relative_to_strips_destination() {
        let dest = Path::new("static/downloads");
        assert_eq!(
            relative_to(dest, Path::new("static/downloads/ABC123.mp4")),
            Some(PathBuf::from("ABC123.mp4"))
        );
        assert_eq!(
            relative_to(dest, Path::new("static/downloads/sub/ABC123.mp4")),
            Some(PathBuf::from("sub/ABC123.mp4"))
        );
    }

    #[test]
    fn test_relative_to_foreign_path_keeps_file_name() {
        let dest = Path::new("/srv/videos");
        assert_eq!(
            relative_to(dest, Path::new("/tmp/elsewhere/ABC123.mp4")),
            Some(PathBuf::from("ABC123.mp4"))
        );
        assert_eq!(
            relative_to(dest, Path::new("../ABC123.mp4")),
            Some(PathBuf::from("ABC123.mp4"))
        );
    }

    #[test]
    fn test_relative_to_rejects_destination_itself() {
        let dest = Path::new("/srv/videos");
        assert_eq!(relative_to(dest, Path::new("/srv/videos")), None);
    }

    /// Shell script standing in for yt-dlp: writes `<dest>/ABC123.mp4` and
    /// prints its path, or fails for URLs containing "private".
    #[cfg(unix)]
    const FAKE_FETCHER: &str = r#"
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then shift; dest=$(dirname "$1"); fi
  last="$1"
  shift
done
case "$last" in
  *private*) echo "ERROR: login required" >&2; exit 1 ;;
  *silent*) exit 0 ;;
esac
echo "fake video" > "$dest/ABC123.mp4"
echo "[download] done"
echo "$dest/ABC123.mp4"
"#;

    #[cfg(unix)]
    fn fake_fetcher(dir: &Path) -> CliVideoFetcher {
        let script = dir.join("fake-fetcher.sh");
        std::fs::write(&script, FAKE_FETCHER).unwrap();
        // Run through sh so the script needs no exec permission
        CliVideoFetcher::new(PathBuf::from("sh"))
            .with_extra_args(vec![script.to_string_lossy().into_owned()])
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_returns_relative_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = temp_dir.path().join("downloads");
        let fetcher = fake_fetcher(temp_dir.path());

        let path = fetcher
            .fetch("https://instagram.com/p/ABC123/", &dest)
            .await
            .unwrap();

        assert_eq!(path, Some(PathBuf::from("ABC123.mp4")));
        assert!(dest.join("ABC123.mp4").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_non_zero_exit_is_empty_result() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fetcher = fake_fetcher(temp_dir.path());

        let path = fetcher
            .fetch("https://instagram.com/p/private/", temp_dir.path())
            .await
            .unwrap();

        assert_eq!(path, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_without_printed_path_is_empty_result() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fetcher = fake_fetcher(temp_dir.path());

        let path = fetcher
            .fetch("https://instagram.com/p/silent/", temp_dir.path())
            .await
            .unwrap();

        assert_eq!(path, None);
    }

    #[tokio::test]
    async fn test_fetch_missing_binary_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fetcher = CliVideoFetcher::new(PathBuf::from("/nonexistent/yt-dlp-binary-xyz"));

        let result = fetcher
            .fetch("https://instagram.com/p/ABC/", temp_dir.path())
            .await;

        assert!(matches!(result, Err(crate::Error::ExternalTool(_))));
    }
}
