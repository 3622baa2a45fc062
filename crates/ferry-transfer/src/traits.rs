use crate::request::TransferRequest;
use async_trait::async_trait;
use ferry_core::StorageKind;
use thiserror::Error;

/// Transfer operation errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Target directory create failed: {0}")]
    TargetDirectoryCreateFailed(String),

    #[error("Post-copy verification failed: {0}")]
    PostCopyVerificationFailed(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Unsupported transfer route: {source_kind} -> {target_kind}")]
    UnsupportedRoute {
        source_kind: StorageKind,
        target_kind: StorageKind,
    },

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),
}

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;

/// What a completed transfer did.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TransferOutcome {
    pub source_kind: StorageKind,
    pub target_kind: StorageKind,
    /// Where the artifact ended up: a filesystem path, `container/key`, or
    /// a remote namespace path.
    pub destination: String,
    /// Bytes moved, when the backend reports them. `None` after a skip.
    pub bytes: Option<u64>,
    /// True when the target already existed and `overwrite` was off.
    pub skipped: bool,
    /// True when the source artifact was removed after the copy.
    pub source_deleted: bool,
}

/// Transfer abstraction trait
///
/// One implementation exists per supported backend pair. Implementations
/// receive a validated request and are responsible for the pair's
/// overwrite, no-op and source-deletion contract.
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Move one artifact from the request's source to its target.
    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferOutcome>;
}
