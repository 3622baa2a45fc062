use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend kinds
///
/// This enum tags every location with the backend that serves it.
/// It's defined in core because both the transfer layer and the CLI use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    S3,
    Gcs,
    Hdfs,
}

impl StorageKind {
    /// Whether this kind addresses objects as container + key.
    pub fn is_object_store(self) -> bool {
        matches!(self, StorageKind::S3 | StorageKind::Gcs)
    }
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "file" => Ok(StorageKind::Local),
            "s3" => Ok(StorageKind::S3),
            "gcs" | "gs" => Ok(StorageKind::Gcs),
            "hdfs" => Ok(StorageKind::Hdfs),
            _ => Err(anyhow::anyhow!("Invalid storage kind: {}", s)),
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageKind::Local => write!(f, "local"),
            StorageKind::S3 => write!(f, "s3"),
            StorageKind::Gcs => write!(f, "gcs"),
            StorageKind::Hdfs => write!(f, "hdfs"),
        }
    }
}
