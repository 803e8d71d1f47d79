//! Filesystem operations through `tokio::fs`

use async_trait::async_trait;
use pyfreeze_errors::PlatformError;
use pyfreeze_events::{AppEvent, EventEmitter, PlatformEvent};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::PlatformContext;
use crate::filesystem::FilesystemOperations;

/// Host filesystem implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFilesystemOperations;

impl NativeFilesystemOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn fs_error(operation: &str, path: &Path, err: &std::io::Error) -> PlatformError {
    PlatformError::FilesystemOperationFailed {
        operation: operation.to_string(),
        message: format!("{}: {err}", path.display()),
    }
}

fn emit_fs_completed(ctx: &PlatformContext, operation: &str, paths: &[&Path]) {
    ctx.emit(AppEvent::Platform(
        PlatformEvent::FilesystemOperationCompleted {
            operation: operation.to_string(),
            paths_affected: paths.iter().map(|p| p.display().to_string()).collect(),
        },
    ));
}

/// Remove whatever is at `path` without following a symlink
async fn remove_existing(path: &Path) -> std::io::Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match result {
        Ok(()) => Ok(true),
        // raced with another remover
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl FilesystemOperations for NativeFilesystemOperations {
    async fn create_dir_all(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| fs_error("create_dir_all", path, &e))?;
        emit_fs_completed(ctx, "create_dir_all", &[path]);
        Ok(())
    }

    async fn remove_path(&self, ctx: &PlatformContext, path: &Path) -> Result<bool, PlatformError> {
        let removed = remove_existing(path)
            .await
            .map_err(|e| fs_error("remove_path", path, &e))?;
        if removed {
            emit_fs_completed(ctx, "remove_path", &[path]);
        }
        Ok(removed)
    }

    async fn move_entry(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
    ) -> Result<(), PlatformError> {
        // rename cannot replace a non-empty directory, and on Windows not even a file
        remove_existing(dst)
            .await
            .map_err(|e| fs_error("move_entry", dst, &e))?;
        fs::rename(src, dst)
            .await
            .map_err(|e| fs_error("move_entry", src, &e))?;
        emit_fs_completed(ctx, "move_entry", &[src, dst]);
        Ok(())
    }

    async fn list_dir(
        &self,
        _ctx: &PlatformContext,
        path: &Path,
    ) -> Result<Vec<PathBuf>, PlatformError> {
        let mut entries = match fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(fs_error("list_dir", path, &e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| fs_error("list_dir", path, &e))?
        {
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn exists(&self, _ctx: &PlatformContext, path: &Path) -> bool {
        fs::symlink_metadata(path).await.is_ok()
    }

    async fn is_dir(&self, _ctx: &PlatformContext, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_remove_path_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("build");
        std::fs::create_dir_all(target.join("nested")).unwrap();
        std::fs::write(target.join("nested/file.txt"), b"x").unwrap();

        let ops = NativeFilesystemOperations::new();
        let ctx = PlatformContext::default();
        assert!(ops.remove_path(&ctx, &target).await.unwrap());
        assert!(!target.exists());
        assert!(!ops.remove_path(&ctx, &target).await.unwrap());
    }

    #[tokio::test]
    async fn test_move_entry_replaces_directory() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("dist/app");
        let dst = dir.path().join("app");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("new.txt"), b"new").unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(dst.join("old.txt"), b"old").unwrap();

        let ops = NativeFilesystemOperations::new();
        ops.move_entry(&PlatformContext::default(), &src, &dst)
            .await
            .unwrap();

        assert!(!src.exists());
        assert!(dst.join("new.txt").exists());
        assert!(!dst.join("old.txt").exists());
    }

    #[tokio::test]
    async fn test_list_dir_missing_is_empty() {
        let dir = tempdir().unwrap();
        let ops = NativeFilesystemOperations::new();
        let listed = ops
            .list_dir(&PlatformContext::default(), &dir.path().join("nope"))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
