use super::*;
use std::path::Path;

#[tokio::test]
async fn test_insert_and_get_record() {
    let (db, _temp_dir) = open_test_db().await;

    let before = chrono::Utc::now().timestamp();
    let id = db.insert_record(&new_record("ABC123")).await.unwrap();
    assert!(id.get() > 0);

    let record = db.get_record(id).await.unwrap().unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.source_url, "https://instagram.com/p/ABC123/");
    assert_eq!(record.shortcode, "ABC123");
    assert_eq!(record.status, Status::Pending);
    assert!(record.file_path.is_none());
    assert!(record.created_at.timestamp() >= before);

    db.close().await;
}

#[tokio::test]
async fn test_get_missing_record() {
    let (db, _temp_dir) = open_test_db().await;

    let record = db.get_record(RecordId(999)).await.unwrap();
    assert!(record.is_none());

    db.close().await;
}

#[tokio::test]
async fn test_mark_completed_stores_file_path() {
    let (db, _temp_dir) = open_test_db().await;

    let id = db.insert_record(&new_record("DONE")).await.unwrap();
    db.mark_completed(id, Path::new("DONE.mp4")).await.unwrap();

    let record = db.get_record(id).await.unwrap().unwrap();
    assert_eq!(record.status, Status::Completed);
    assert_eq!(record.file_path, Some(PathBuf::from("DONE.mp4")));

    db.close().await;
}

#[tokio::test]
async fn test_mark_failed() {
    let (db, _temp_dir) = open_test_db().await;

    let id = db.insert_record(&new_record("NOPE")).await.unwrap();
    db.mark_failed(id).await.unwrap();

    let record = db.get_record(id).await.unwrap().unwrap();
    assert_eq!(record.status, Status::Failed);
    assert!(record.file_path.is_none());

    db.close().await;
}

#[tokio::test]
async fn test_status_transitions_only_once() {
    let (db, _temp_dir) = open_test_db().await;

    let id = db.insert_record(&new_record("ONCE")).await.unwrap();
    db.mark_failed(id).await.unwrap();

    let err = db
        .mark_completed(id, Path::new("ONCE.mp4"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        crate::Error::Database(crate::error::DatabaseError::InvalidTransition { .. })
    ));

    let err = db.mark_failed(id).await.unwrap_err();
    assert!(matches!(
        err,
        crate::Error::Database(crate::error::DatabaseError::InvalidTransition { .. })
    ));

    // The first transition is preserved
    let record = db.get_record(id).await.unwrap().unwrap();
    assert_eq!(record.status, Status::Failed);
    assert!(record.file_path.is_none());

    db.close().await;
}

#[tokio::test]
async fn test_update_missing_record_is_rejected() {
    let (db, _temp_dir) = open_test_db().await;

    assert!(db.mark_failed(RecordId(42)).await.is_err());

    db.close().await;
}

#[tokio::test]
async fn test_same_url_creates_independent_records() {
    let (db, _temp_dir) = open_test_db().await;

    let first = db.insert_record(&new_record("TWICE")).await.unwrap();
    let second = db.insert_record(&new_record("TWICE")).await.unwrap();
    assert_ne!(first, second);
    assert_eq!(db.count_records(None).await.unwrap(), 2);

    db.mark_completed(first, Path::new("TWICE.mp4")).await.unwrap();
    assert_eq!(
        db.count_records(Some(Status::Pending)).await.unwrap(),
        1,
        "second record is unaffected by the first one's update"
    );

    db.close().await;
}

#[tokio::test]
async fn test_query_after_pool_close_returns_error() {
    let (db, _temp_dir) = open_test_db().await;
    let id = db.insert_record(&new_record("CLOSED")).await.unwrap();

    db.pool().close().await;

    let result = db.get_record(id).await;
    assert!(
        result.is_err(),
        "get_record after pool close should return an error, got: {:?}",
        result
    );
}
