//! Object-store transfers
//!
//! Uploads and downloads between local disk and S3/GCS-style object
//! stores. The artifact lives at `key-prefix/filename` inside the
//! location's container.

use crate::local::path_exists;
use crate::request::TransferRequest;
use crate::session::SessionCache;
use crate::traits::{Transfer, TransferError, TransferOutcome, TransferResult};
use async_trait::async_trait;
use bytes::Bytes;
use ferry_core::StorageKind;
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;

/// Object key for an artifact: `prefix/filename`, with an empty prefix
/// collapsing to the bare filename.
fn object_key(prefix: &str, filename: &str) -> String {
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), filename)
    }
}

/// Disk-to-object-store upload.
///
/// The upload replaces any current object unconditionally, so `overwrite`
/// has no effect for this pair. When `delete_source` is set the local file
/// is removed after the upload succeeds.
pub struct LocalToObjectStore {
    kind: StorageKind,
    sessions: Arc<SessionCache>,
}

impl LocalToObjectStore {
    pub fn new(kind: StorageKind, sessions: Arc<SessionCache>) -> Self {
        LocalToObjectStore { kind, sessions }
    }
}

#[async_trait]
impl Transfer for LocalToObjectStore {
    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferOutcome> {
        let (container, prefix) = request.target().split_container()?;
        let source = request.source_file();
        let start = Instant::now();

        if !path_exists(&source).await {
            return Err(TransferError::SourceNotFound(source.display().to_string()));
        }
        if !request.overwrite() {
            // No pre-upload existence check exists for object targets; the
            // upload replaces any current object regardless of this flag.
            tracing::debug!(
                container = %container,
                "overwrite flag has no effect for object-store targets"
            );
        }

        let session =
            self.sessions
                .obtain(self.kind, request.session_params(), request.reuse_session())?;
        let store = session.store_for(container).await?;

        let data = fs::read(&source).await.map_err(|e| {
            TransferError::UploadFailed(format!("failed to read {}: {}", source.display(), e))
        })?;
        let size = data.len() as u64;
        let key = object_key(prefix, request.filename());
        let location = ObjectPath::from(key.clone());

        let result: ObjectResult<_> = store.put(&location, PutPayload::from(Bytes::from(data))).await;
        if let Err(e) = result {
            tracing::error!(
                error = %e,
                container = %container,
                key = %key,
                "Object upload failed"
            );
            return Err(TransferError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            container = %container,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        let mut source_deleted = false;
        if request.delete_source() {
            fs::remove_file(&source).await.map_err(|e| {
                TransferError::DeleteFailed(format!("{}: {}", source.display(), e))
            })?;
            source_deleted = true;
        }

        Ok(TransferOutcome {
            source_kind: StorageKind::Local,
            target_kind: self.kind,
            destination: format!("{}/{}", container, key),
            bytes: Some(size),
            skipped: false,
            source_deleted,
        })
    }
}

/// Object-store-to-disk download.
///
/// When `overwrite` is off and the local target file already exists the
/// call succeeds without touching the backend; in that branch a requested
/// source deletion is not performed either. The target directory is not
/// created for this pair.
pub struct ObjectStoreToLocal {
    kind: StorageKind,
    sessions: Arc<SessionCache>,
}

impl ObjectStoreToLocal {
    pub fn new(kind: StorageKind, sessions: Arc<SessionCache>) -> Self {
        ObjectStoreToLocal { kind, sessions }
    }
}

#[async_trait]
impl Transfer for ObjectStoreToLocal {
    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferOutcome> {
        let target = request.target_file();
        let start = Instant::now();

        // The no-op check comes before any source addressing: an existing
        // target with overwrite off short-circuits the whole call.
        if !request.overwrite() && path_exists(&target).await {
            tracing::info!(
                source = %request.source(),
                target = %target.display(),
                "Object download skipped, target exists and overwrite is off"
            );
            return Ok(TransferOutcome {
                source_kind: self.kind,
                target_kind: StorageKind::Local,
                destination: target.display().to_string(),
                bytes: None,
                skipped: true,
                source_deleted: false,
            });
        }

        let (container, prefix) = request.source().split_container()?;
        let session =
            self.sessions
                .obtain(self.kind, request.session_params(), request.reuse_session())?;
        let store = session.store_for(container).await?;

        let key = object_key(prefix, request.filename());
        let location = ObjectPath::from(key.clone());

        let result: ObjectResult<_> = store.get(&location).await;
        let get_result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => {
                TransferError::SourceNotFound(format!("{}/{}", container, key))
            }
            other => {
                tracing::error!(
                    error = %other,
                    container = %container,
                    key = %key,
                    "Object download failed"
                );
                TransferError::DownloadFailed(other.to_string())
            }
        })?;

        let data = get_result
            .bytes()
            .await
            .map_err(|e| TransferError::DownloadFailed(e.to_string()))?;
        let size = data.len() as u64;

        fs::write(&target, &data).await.map_err(|e| {
            TransferError::DownloadFailed(format!("failed to write {}: {}", target.display(), e))
        })?;

        tracing::info!(
            container = %container,
            key = %key,
            target = %target.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object download successful"
        );

        let mut source_deleted = false;
        if request.delete_source() {
            let result: ObjectResult<_> = store.delete(&location).await;
            if let Err(e) = result {
                tracing::error!(
                    error = %e,
                    container = %container,
                    key = %key,
                    "Object delete failed"
                );
                return Err(TransferError::DeleteFailed(e.to_string()));
            }
            source_deleted = true;
        }

        Ok(TransferOutcome {
            source_kind: self.kind,
            target_kind: StorageKind::Local,
            destination: target.display().to_string(),
            bytes: Some(size),
            skipped: false,
            source_deleted,
        })
    }
}
