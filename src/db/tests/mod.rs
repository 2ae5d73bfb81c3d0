use super::*;
use tempfile::TempDir;

mod records;

/// Open a fresh database inside a temp directory (kept alive by the caller)
async fn open_test_db() -> (Database, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::open(&temp_dir.path().join("test.db"))
        .await
        .unwrap();
    (db, temp_dir)
}

fn new_record(shortcode: &str) -> NewRecord {
    NewRecord {
        source_url: format!("https://instagram.com/p/{}/", shortcode),
        shortcode: shortcode.to_string(),
    }
}
