//! Transfer dispatch
//!
//! `TransferAdapter` validates a request and routes it to the
//! implementation for its `(source, target)` backend pair.

#[cfg(feature = "backend-hdfs")]
use crate::hdfs::{HadoopShell, HdfsShell, LocalToHdfs};
use crate::local::LocalToLocal;
use crate::object::{LocalToObjectStore, ObjectStoreToLocal};
use crate::request::TransferRequest;
use crate::session::SessionCache;
use crate::traits::{Transfer, TransferError, TransferOutcome, TransferResult};
use ferry_core::StorageKind;
use std::sync::Arc;

/// Uniform entry point for single-artifact transfers.
///
/// The adapter owns the process-wide session cache and the shell used for
/// HDFS namespace operations; both can be replaced by the embedding
/// application. Dispatch happens per call on the request's backend kinds.
pub struct TransferAdapter {
    sessions: Arc<SessionCache>,
    #[cfg(feature = "backend-hdfs")]
    hdfs: Arc<dyn HdfsShell>,
}

impl TransferAdapter {
    pub fn new() -> Self {
        TransferAdapter {
            sessions: Arc::new(SessionCache::new()),
            #[cfg(feature = "backend-hdfs")]
            hdfs: Arc::new(HadoopShell::default()),
        }
    }

    /// Share a caller-owned session cache.
    pub fn with_sessions(mut self, sessions: Arc<SessionCache>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Replace the shell used for HDFS namespace operations.
    #[cfg(feature = "backend-hdfs")]
    pub fn with_hdfs_shell(mut self, shell: Arc<dyn HdfsShell>) -> Self {
        self.hdfs = shell;
        self
    }

    /// Move one artifact from the request's source to its target.
    pub async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferOutcome> {
        validate(request)?;

        let route: Box<dyn Transfer> = match (request.source().kind(), request.target().kind()) {
            (StorageKind::Local, StorageKind::Local) => Box::new(LocalToLocal),

            #[cfg(feature = "backend-hdfs")]
            (StorageKind::Local, StorageKind::Hdfs) => {
                Box::new(LocalToHdfs::new(self.hdfs.clone()))
            }
            #[cfg(not(feature = "backend-hdfs"))]
            (StorageKind::Local, StorageKind::Hdfs) => {
                return Err(TransferError::BackendUnavailable(
                    "HDFS backend not available (backend-hdfs feature not enabled)".to_string(),
                ))
            }

            (StorageKind::Local, kind) if kind.is_object_store() => {
                Box::new(LocalToObjectStore::new(kind, self.sessions.clone()))
            }
            (kind, StorageKind::Local) if kind.is_object_store() => {
                Box::new(ObjectStoreToLocal::new(kind, self.sessions.clone()))
            }

            (source_kind, target_kind) => {
                return Err(TransferError::UnsupportedRoute {
                    source_kind,
                    target_kind,
                })
            }
        };

        route.transfer(request).await
    }
}

impl Default for TransferAdapter {
    fn default() -> Self {
        TransferAdapter::new()
    }
}

/// Request preconditions shared by every route.
fn validate(request: &TransferRequest) -> TransferResult<()> {
    let filename = request.filename();
    if filename.is_empty() {
        return Err(TransferError::InvalidFilename(
            "filename must not be empty".to_string(),
        ));
    }
    if filename.contains("..") || filename.starts_with('/') {
        return Err(TransferError::InvalidFilename(format!(
            "filename '{}' must stay inside its location",
            filename
        )));
    }
    if request.source().path().is_empty() || request.target().path().is_empty() {
        return Err(TransferError::InvalidLocation(
            "location path must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::StorageLocation;

    fn request(source: StorageLocation, target: StorageLocation) -> TransferRequest {
        TransferRequest::new(source, target, "model.bin")
    }

    #[tokio::test]
    async fn test_object_to_object_is_unsupported() {
        let adapter = TransferAdapter::new();
        let result = adapter
            .transfer(&request(
                StorageLocation::s3("bucket-a/daily"),
                StorageLocation::gcs("bucket-b/daily"),
            ))
            .await;
        assert!(matches!(
            result,
            Err(TransferError::UnsupportedRoute {
                source_kind: StorageKind::S3,
                target_kind: StorageKind::Gcs,
            })
        ));
    }

    #[tokio::test]
    async fn test_unsupported_route_error_names_both_kinds() {
        let adapter = TransferAdapter::new();
        let err = adapter
            .transfer(&request(
                StorageLocation::s3("bucket-a/daily"),
                StorageLocation::gcs("bucket-b/daily"),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported transfer route: s3 -> gcs");
    }

    #[tokio::test]
    async fn test_hdfs_source_is_unsupported() {
        let adapter = TransferAdapter::new();
        let result = adapter
            .transfer(&request(
                StorageLocation::hdfs("hdfs://nameservice/models"),
                StorageLocation::local("/tmp/models"),
            ))
            .await;
        assert!(matches!(
            result,
            Err(TransferError::UnsupportedRoute {
                source_kind: StorageKind::Hdfs,
                target_kind: StorageKind::Local,
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_filename_is_rejected() {
        let adapter = TransferAdapter::new();
        let result = adapter
            .transfer(&TransferRequest::new(
                StorageLocation::local("/tmp/a"),
                StorageLocation::local("/tmp/b"),
                "",
            ))
            .await;
        assert!(matches!(result, Err(TransferError::InvalidFilename(_))));
    }

    #[tokio::test]
    async fn test_traversal_filename_is_rejected() {
        let adapter = TransferAdapter::new();
        for filename in ["../secrets.txt", "/etc/passwd"] {
            let result = adapter
                .transfer(&TransferRequest::new(
                    StorageLocation::local("/tmp/a"),
                    StorageLocation::local("/tmp/b"),
                    filename,
                ))
                .await;
            assert!(matches!(result, Err(TransferError::InvalidFilename(_))));
        }
    }

    #[tokio::test]
    async fn test_empty_location_path_is_rejected() {
        let adapter = TransferAdapter::new();
        let result = adapter
            .transfer(&request(
                StorageLocation::local(""),
                StorageLocation::local("/tmp/b"),
            ))
            .await;
        assert!(matches!(result, Err(TransferError::InvalidLocation(_))));
    }
}
