//! HDFS-like namespace transfers
//!
//! The remote namespace is driven through a command-style shell, `hadoop
//! fs` by default. The shell is a trait so transfers can run against a
//! fake namespace in tests.

use crate::local::path_exists;
use crate::request::TransferRequest;
use crate::traits::{Transfer, TransferError, TransferOutcome, TransferResult};
use async_trait::async_trait;
use ferry_core::StorageKind;
use std::path::Path;
use std::process::Output;
use std::sync::Arc;
use std::time::Instant;
use tokio::process::Command;

/// Command-style interface to an HDFS-like remote namespace.
#[async_trait]
pub trait HdfsShell: Send + Sync {
    /// Whether `remote_dir` exists in the remote namespace.
    async fn dir_exists(&self, remote_dir: &str) -> TransferResult<bool>;

    /// Create `remote_dir` and any missing parents.
    async fn mkdir_recursive(&self, remote_dir: &str) -> TransferResult<()>;

    /// Copy a local file into the remote namespace.
    async fn copy_from_local(&self, local: &Path, remote: &str) -> TransferResult<()>;
}

/// `HdfsShell` backed by the `hadoop` command-line tool.
pub struct HadoopShell {
    program: String,
}

impl HadoopShell {
    pub fn new(program: impl Into<String>) -> Self {
        HadoopShell {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> TransferResult<Output> {
        Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                TransferError::BackendUnavailable(format!(
                    "failed to run {}: {}",
                    self.program, e
                ))
            })
    }
}

impl Default for HadoopShell {
    fn default() -> Self {
        HadoopShell::new("hadoop")
    }
}

#[async_trait]
impl HdfsShell for HadoopShell {
    async fn dir_exists(&self, remote_dir: &str) -> TransferResult<bool> {
        // `fs -test -d` signals existence through the exit code alone.
        let output = self.run(&["fs", "-test", "-d", remote_dir]).await?;
        Ok(output.status.success())
    }

    async fn mkdir_recursive(&self, remote_dir: &str) -> TransferResult<()> {
        let output = self.run(&["fs", "-mkdir", "-p", remote_dir]).await?;
        if !output.status.success() {
            return Err(TransferError::TargetDirectoryCreateFailed(format!(
                "{}: {}",
                remote_dir,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }

    async fn copy_from_local(&self, local: &Path, remote: &str) -> TransferResult<()> {
        let local = local.to_string_lossy();
        let output = self
            .run(&["fs", "-copyFromLocal", local.as_ref(), remote])
            .await?;
        if !output.status.success() {
            return Err(TransferError::UploadFailed(format!(
                "{} -> {}: {}",
                local,
                remote,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}

/// Remote file path for an artifact under a namespace directory.
fn join_remote(remote_dir: &str, filename: &str) -> String {
    format!("{}/{}", remote_dir.trim_end_matches('/'), filename)
}

/// Disk-to-HDFS transfer.
///
/// The remote directory is created when the existence check misses.
/// `overwrite` and `delete_source` are accepted but not enforced for this
/// pair: the remote copy always proceeds and the local source is kept.
pub struct LocalToHdfs {
    shell: Arc<dyn HdfsShell>,
}

impl LocalToHdfs {
    pub fn new(shell: Arc<dyn HdfsShell>) -> Self {
        LocalToHdfs { shell }
    }
}

#[async_trait]
impl Transfer for LocalToHdfs {
    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferOutcome> {
        let source = request.source_file();
        let remote_dir = request.target().path();
        let start = Instant::now();

        if !path_exists(&source).await {
            return Err(TransferError::SourceNotFound(source.display().to_string()));
        }
        if request.overwrite() || request.delete_source() {
            tracing::debug!(
                remote_dir = %remote_dir,
                "overwrite and delete_source are not enforced for hdfs targets"
            );
        }

        let size = tokio::fs::metadata(&source).await.ok().map(|m| m.len());

        if !self.shell.dir_exists(remote_dir).await? {
            self.shell.mkdir_recursive(remote_dir).await?;
        }

        let remote_file = join_remote(remote_dir, request.filename());
        self.shell.copy_from_local(&source, &remote_file).await?;

        tracing::info!(
            source = %source.display(),
            remote = %remote_file,
            size_bytes = size.unwrap_or(0),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "HDFS copy successful"
        );

        Ok(TransferOutcome {
            source_kind: StorageKind::Local,
            target_kind: StorageKind::Hdfs,
            destination: remote_file,
            bytes: size,
            skipped: false,
            source_deleted: false,
        })
    }
}
