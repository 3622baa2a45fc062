use crate::request::TransferRequest;
use crate::traits::{Transfer, TransferError, TransferOutcome, TransferResult};
use async_trait::async_trait;
use ferry_core::StorageKind;
use std::path::Path;
use std::time::Instant;
use tokio::fs;

/// True when `path` names an existing file or directory.
pub(crate) async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Create `dir` and any missing parents.
pub(crate) async fn ensure_dir(dir: &Path) -> TransferResult<()> {
    fs::create_dir_all(dir).await.map_err(|e| {
        TransferError::TargetDirectoryCreateFailed(format!("{}: {}", dir.display(), e))
    })
}

/// True when both paths resolve to the same existing file.
pub(crate) async fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Delete `source` after confirming `target` exists.
///
/// The check guards the destructive half of a move: when the target cannot
/// be confirmed the source is left untouched and the caller gets
/// `PostCopyVerificationFailed`.
pub(crate) async fn remove_source_checked(source: &Path, target: &Path) -> TransferResult<()> {
    if !path_exists(target).await {
        return Err(TransferError::PostCopyVerificationFailed(format!(
            "target {} missing after copy of {}",
            target.display(),
            source.display()
        )));
    }
    fs::remove_file(source)
        .await
        .map_err(|e| TransferError::DeleteFailed(format!("{}: {}", source.display(), e)))
}

/// Disk-to-disk transfer.
///
/// The target directory is created if missing. When `overwrite` is off and
/// the target file already exists the copy is skipped and the call
/// succeeds. A requested source deletion still runs after a skipped copy;
/// it is gated only on the target file existing. A source and target that
/// resolve to the same file fail with `CopyFailed` and the file is left
/// untouched.
pub struct LocalToLocal;

#[async_trait]
impl Transfer for LocalToLocal {
    async fn transfer(&self, request: &TransferRequest) -> TransferResult<TransferOutcome> {
        let source = request.source_file();
        let target = request.target_file();
        let start = Instant::now();

        // The skip and delete paths below assume source and target are
        // distinct files.
        if same_file(&source, &target).await {
            return Err(TransferError::CopyFailed(format!(
                "source and target are the same file: {}",
                source.display()
            )));
        }

        ensure_dir(Path::new(request.target().path())).await?;

        let mut bytes = None;
        let skipped = !request.overwrite() && path_exists(&target).await;
        if skipped {
            tracing::info!(
                source = %source.display(),
                target = %target.display(),
                "Local copy skipped, target exists and overwrite is off"
            );
        } else {
            if !path_exists(&source).await {
                return Err(TransferError::SourceNotFound(source.display().to_string()));
            }
            let copied = fs::copy(&source, &target).await.map_err(|e| {
                TransferError::CopyFailed(format!(
                    "{} -> {}: {}",
                    source.display(),
                    target.display(),
                    e
                ))
            })?;
            bytes = Some(copied);

            tracing::info!(
                source = %source.display(),
                target = %target.display(),
                size_bytes = copied,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Local copy successful"
            );
        }

        let mut source_deleted = false;
        if request.delete_source() {
            remove_source_checked(&source, &target).await?;
            source_deleted = true;
        }

        Ok(TransferOutcome {
            source_kind: StorageKind::Local,
            target_kind: StorageKind::Local,
            destination: target.display().to_string(),
            bytes,
            skipped,
            source_deleted,
        })
    }
}
