//! Instagram URL handling: input validation and shortcode extraction.

use crate::{Error, Result};
use url::Url;

/// Validate a submitted URL and return it trimmed.
///
/// Only empty or whitespace-only input is rejected with
/// [`Error::Validation`]. Anything else is handed to the fetcher, which
/// decides whether it points at a video (yt-dlp accepts scheme-less URLs
/// such as `instagram.com/p/ABC123/`).
pub fn validate_post_url(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("no URL provided".to_string()));
    }
    Ok(trimmed)
}

/// Last non-empty path segment of `url`.
///
/// `https://instagram.com/p/ABC123/` and `instagram.com/p/ABC123` both give
/// `ABC123`. An absolute URL without path segments gives an empty string.
/// Text that is not an absolute URL is split on `/` after dropping any query
/// or fragment.
pub fn extract_shortcode(url: &str) -> String {
    let url = url.trim();
    match Url::parse(url) {
        Ok(parsed) if !parsed.cannot_be_a_base() => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or_default()
            .to_string(),
        _ => raw_path_shortcode(url),
    }
}

fn raw_path_shortcode(text: &str) -> String {
    let path = text.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}
