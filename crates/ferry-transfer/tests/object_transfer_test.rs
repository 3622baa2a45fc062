use ferry_transfer::{
    ObjectStoreSession, SessionCache, StorageKind, StorageLocation, TransferAdapter,
    TransferRequest,
};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};
use std::sync::Arc;
use tempfile::tempdir;
use tokio::fs;

/// Adapter wired to an in-memory bucket instead of a real backend.
fn adapter_with_bucket(bucket: &str) -> (TransferAdapter, Arc<dyn ObjectStore>) {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let session = ObjectStoreSession::with_store(StorageKind::S3, bucket, store.clone());
    let sessions = Arc::new(SessionCache::new().with_session(Arc::new(session)));
    (TransferAdapter::new().with_sessions(sessions), store)
}

#[tokio::test]
async fn test_upload_then_download_round_trip() {
    let (adapter, _store) = adapter_with_bucket("models-bucket");
    let source_dir = tempdir().unwrap();
    let target_dir = tempdir().unwrap();
    fs::write(source_dir.path().join("model.bin"), b"weights-v1")
        .await
        .unwrap();

    let upload = TransferRequest::new(
        StorageLocation::local(source_dir.path().display().to_string()),
        StorageLocation::s3("models-bucket/daily"),
        "model.bin",
    );
    let uploaded = adapter.transfer(&upload).await.unwrap();
    assert_eq!(uploaded.destination, "models-bucket/daily/model.bin");
    assert_eq!(uploaded.bytes, Some(10));

    let download = TransferRequest::new(
        StorageLocation::s3("models-bucket/daily"),
        StorageLocation::local(target_dir.path().display().to_string()),
        "model.bin",
    );
    let downloaded = adapter.transfer(&download).await.unwrap();
    assert_eq!(downloaded.bytes, Some(10));

    let fetched = fs::read(target_dir.path().join("model.bin")).await.unwrap();
    assert_eq!(fetched, b"weights-v1");
}

#[tokio::test]
async fn test_upload_as_move_removes_local_source() {
    let (adapter, store) = adapter_with_bucket("models-bucket");
    let source_dir = tempdir().unwrap();
    let source = source_dir.path().join("model.bin");
    fs::write(&source, b"weights").await.unwrap();

    let request = TransferRequest::new(
        StorageLocation::local(source_dir.path().display().to_string()),
        StorageLocation::s3("models-bucket/daily"),
        "model.bin",
    )
    .with_delete_source(true);
    let outcome = adapter.transfer(&request).await.unwrap();

    assert!(outcome.source_deleted);
    assert!(!fs::try_exists(&source).await.unwrap());
    let stored = store
        .get(&ObjectPath::from("daily/model.bin"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(stored.as_ref(), b"weights");
}

#[tokio::test]
async fn test_download_as_move_removes_remote_object() {
    let (adapter, store) = adapter_with_bucket("models-bucket");
    store
        .put(
            &ObjectPath::from("daily/model.bin"),
            PutPayload::from_static(b"weights"),
        )
        .await
        .unwrap();
    let target_dir = tempdir().unwrap();

    let request = TransferRequest::new(
        StorageLocation::s3("models-bucket/daily"),
        StorageLocation::local(target_dir.path().display().to_string()),
        "model.bin",
    )
    .with_delete_source(true);
    let outcome = adapter.transfer(&request).await.unwrap();

    assert!(outcome.source_deleted);
    assert!(store.get(&ObjectPath::from("daily/model.bin")).await.is_err());
    let fetched = fs::read(target_dir.path().join("model.bin")).await.unwrap();
    assert_eq!(fetched, b"weights");
}

#[tokio::test]
async fn test_existing_local_file_blocks_download_and_remote_delete() {
    let (adapter, store) = adapter_with_bucket("models-bucket");
    store
        .put(
            &ObjectPath::from("daily/model.bin"),
            PutPayload::from_static(b"remote"),
        )
        .await
        .unwrap();
    let target_dir = tempdir().unwrap();
    fs::write(target_dir.path().join("model.bin"), b"local")
        .await
        .unwrap();

    let request = TransferRequest::new(
        StorageLocation::s3("models-bucket/daily"),
        StorageLocation::local(target_dir.path().display().to_string()),
        "model.bin",
    )
    .with_delete_source(true);
    let outcome = adapter.transfer(&request).await.unwrap();

    assert!(outcome.skipped);
    assert!(!outcome.source_deleted);
    let kept = fs::read(target_dir.path().join("model.bin")).await.unwrap();
    assert_eq!(kept, b"local");
    assert!(store.get(&ObjectPath::from("daily/model.bin")).await.is_ok());
}

#[tokio::test]
async fn test_upload_with_empty_prefix_uses_bare_filename() {
    let (adapter, store) = adapter_with_bucket("models-bucket");
    let source_dir = tempdir().unwrap();
    fs::write(source_dir.path().join("model.bin"), b"weights")
        .await
        .unwrap();

    let request = TransferRequest::new(
        StorageLocation::local(source_dir.path().display().to_string()),
        StorageLocation::s3("models-bucket/"),
        "model.bin",
    );
    let outcome = adapter.transfer(&request).await.unwrap();

    assert_eq!(outcome.destination, "models-bucket/model.bin");
    assert!(store.get(&ObjectPath::from("model.bin")).await.is_ok());
}
