use crate::location::StorageLocation;
use crate::session::SessionParams;
use std::path::PathBuf;

/// A single-artifact transfer request.
///
/// Defaults: overwrite off, source kept, empty session parameters, shared
/// session reuse on. The flags configure intent only; whether a pair
/// enforces them is part of that pair's contract.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    source: StorageLocation,
    target: StorageLocation,
    filename: String,
    overwrite: bool,
    delete_source: bool,
    session_params: SessionParams,
    reuse_session: bool,
}

impl TransferRequest {
    pub fn new(
        source: StorageLocation,
        target: StorageLocation,
        filename: impl Into<String>,
    ) -> Self {
        TransferRequest {
            source,
            target,
            filename: filename.into(),
            overwrite: false,
            delete_source: false,
            session_params: SessionParams::new(),
            reuse_session: true,
        }
    }

    /// Replace the target file if it already exists.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Delete the source artifact once the copy is confirmed.
    pub fn with_delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    /// Session configuration for the object-store side of the route.
    pub fn with_session_params(mut self, params: SessionParams) -> Self {
        self.session_params = params;
        self
    }

    /// Opt in or out of the process-wide shared session for this call.
    pub fn with_session_reuse(mut self, reuse: bool) -> Self {
        self.reuse_session = reuse;
        self
    }

    pub fn source(&self) -> &StorageLocation {
        &self.source
    }

    pub fn target(&self) -> &StorageLocation {
        &self.target
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn delete_source(&self) -> bool {
        self.delete_source
    }

    pub fn session_params(&self) -> &SessionParams {
        &self.session_params
    }

    pub fn reuse_session(&self) -> bool {
        self.reuse_session
    }

    /// Full path of the artifact under the source directory. Only
    /// meaningful when the source side is a local filesystem.
    pub(crate) fn source_file(&self) -> PathBuf {
        PathBuf::from(self.source.path()).join(&self.filename)
    }

    /// Full path of the artifact under the target directory. Only
    /// meaningful when the target side is a local filesystem.
    pub(crate) fn target_file(&self) -> PathBuf {
        PathBuf::from(self.target.path()).join(&self.filename)
    }
}
