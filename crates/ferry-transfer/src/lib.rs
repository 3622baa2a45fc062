//! Ferry Transfer Library
//!
//! This crate provides the artifact transfer abstraction for ferry: one
//! uniform operation that moves a single named file between local disk
//! and the supported remote storage backends.
//!
//! # Location Format
//!
//! A [`StorageLocation`] tags a backend kind with a backend-specific path:
//!
//! - **Local**: a filesystem directory (`/var/models`, `file:///var/models`)
//! - **S3 / GCS**: `container/key-prefix`, split on the first `/`
//!   (`s3://models-bucket/daily`, `gs://models-bucket/daily`)
//! - **HDFS**: a remote namespace directory (`hdfs://nameservice/models`),
//!   passed verbatim to the `hadoop` shell
//!
//! The overwrite, no-op and source-deletion semantics differ by backend
//! pair; each pair implementation documents its own contract.

pub mod adapter;
#[cfg(feature = "backend-hdfs")]
pub mod hdfs;
pub mod local;
pub mod location;
pub mod object;
pub mod request;
pub mod session;
pub mod traits;

// Re-export commonly used types
pub use adapter::TransferAdapter;
pub use ferry_core::StorageKind;
#[cfg(feature = "backend-hdfs")]
pub use hdfs::{HadoopShell, HdfsShell, LocalToHdfs};
pub use local::LocalToLocal;
pub use location::StorageLocation;
pub use object::{LocalToObjectStore, ObjectStoreToLocal};
pub use request::TransferRequest;
pub use session::{ObjectStoreSession, SessionCache, SessionParams};
pub use traits::{Transfer, TransferError, TransferOutcome, TransferResult};
