//! Filesystem operations used to publish and clean up build output

use async_trait::async_trait;
use pyfreeze_errors::PlatformError;
use std::path::{Path, PathBuf};

use crate::core::PlatformContext;

/// Trait for the filesystem operations the pipeline needs
#[async_trait]
pub trait FilesystemOperations: Send + Sync {
    /// Create directory and all parent directories
    async fn create_dir_all(&self, ctx: &PlatformContext, path: &Path)
        -> Result<(), PlatformError>;

    /// Remove a file or a directory tree
    ///
    /// Returns `false` when nothing existed at `path`.
    async fn remove_path(&self, ctx: &PlatformContext, path: &Path)
        -> Result<bool, PlatformError>;

    /// Move `src` to `dst`, replacing whatever is at `dst`
    async fn move_entry(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
    ) -> Result<(), PlatformError>;

    /// Entries directly inside `path`, sorted by name
    ///
    /// A missing directory yields an empty list.
    async fn list_dir(&self, ctx: &PlatformContext, path: &Path)
        -> Result<Vec<PathBuf>, PlatformError>;

    /// Check if a path exists
    async fn exists(&self, ctx: &PlatformContext, path: &Path) -> bool;

    /// Check if a path points to a directory.
    async fn is_dir(&self, ctx: &PlatformContext, path: &Path) -> bool;
}
