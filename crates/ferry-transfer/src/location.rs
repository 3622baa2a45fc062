use crate::traits::{TransferError, TransferResult};
use ferry_core::StorageKind;
use std::fmt;
use std::str::FromStr;

/// A backend-tagged storage path.
///
/// Path semantics are backend-specific:
/// - `Local`: a filesystem directory
/// - `S3` / `Gcs`: `container/key-prefix`, split on the first `/`
/// - `Hdfs`: a remote namespace directory, passed to the shell verbatim
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageLocation {
    kind: StorageKind,
    path: String,
}

impl StorageLocation {
    pub fn new(kind: StorageKind, path: impl Into<String>) -> Self {
        StorageLocation {
            kind,
            path: path.into(),
        }
    }

    /// A directory on the local filesystem.
    pub fn local(path: impl Into<String>) -> Self {
        StorageLocation::new(StorageKind::Local, path)
    }

    /// An S3 `container/key-prefix` location.
    pub fn s3(path: impl Into<String>) -> Self {
        StorageLocation::new(StorageKind::S3, path)
    }

    /// A GCS `container/key-prefix` location.
    pub fn gcs(path: impl Into<String>) -> Self {
        StorageLocation::new(StorageKind::Gcs, path)
    }

    /// A directory in an HDFS-like remote namespace.
    pub fn hdfs(path: impl Into<String>) -> Self {
        StorageLocation::new(StorageKind::Hdfs, path)
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Split an object-store location into container and key prefix on the
    /// first separator. The prefix may be empty; the container may not.
    pub fn split_container(&self) -> TransferResult<(&str, &str)> {
        match self.path.split_once('/') {
            Some((container, prefix)) if !container.is_empty() => Ok((container, prefix)),
            _ => Err(TransferError::InvalidLocation(format!(
                "object-store location '{}' must be 'container/key-prefix'",
                self.path
            ))),
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == StorageKind::Local || self.path.contains("://") {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}://{}", self.kind, self.path)
        }
    }
}

impl FromStr for StorageLocation {
    type Err = TransferError;

    /// Parse `scheme://path` into a tagged location.
    ///
    /// `s3://`, `gs://`/`gcs://` and `file://` strip the scheme; `hdfs://`
    /// keeps the full URI because the shell understands it as-is. A string
    /// without a scheme is a local path. Unknown schemes are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TransferError::InvalidLocation(
                "location must not be empty".to_string(),
            ));
        }
        let Some((scheme, rest)) = s.split_once("://") else {
            return Ok(StorageLocation::local(s));
        };
        let kind: StorageKind = scheme.parse().map_err(|_| {
            TransferError::InvalidLocation(format!("unknown scheme '{}' in '{}'", scheme, s))
        })?;
        Ok(match kind {
            StorageKind::Hdfs => StorageLocation::hdfs(s),
            kind => StorageLocation::new(kind, rest),
        })
    }
}
