use super::*;
use crate::downloader::test_helpers::{
    FAKE_VIDEO_BYTES, Script, ScriptedFetcher, create_test_downloader,
    create_test_downloader_with, wait_until_settled,
};
use crate::error::FetchError;
use crate::types::Status;
use std::path::PathBuf;
use std::time::Duration;


#[test]
fn test_video_url_plain_file() {
    assert_eq!(video_url(Path::new("ABC123.mp4")), "/video/ABC123.mp4");
}

#[test]
fn test_video_url_encodes_each_segment() {
    assert_eq!(
        video_url(Path::new("my clips/vidéo #1.mp4")),
        "/video/my%20clips/vid%C3%A9o%20%231.mp4"
    );
}

#[test]
fn test_video_url_drops_non_plain_components() {
    assert_eq!(video_url(Path::new("./a/../b.mp4")), "/video/a/b.mp4");
}
