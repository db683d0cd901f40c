//! Local filesystem adapter backed by `tokio::fs`.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use super::Filesystem;
use crate::core::error::{DeleteError, SyncError};

/// Filesystem adapter for real directories
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn list_files(&self, dir: &Path) -> Result<Vec<String>, SyncError> {
        let unreadable = |source| SyncError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(unreadable)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            // Follows symlinks, so a link to a regular file counts as one
            let is_file = match fs::metadata(entry.path()).await {
                Ok(meta) => meta.is_file(),
                Err(e) => {
                    warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Skipping entry with unreadable metadata"
                    );
                    false
                }
            };
            if !is_file {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    warn!(name = ?raw, "Skipping non UTF-8 file name");
                }
            }
        }

        Ok(names)
    }

    async fn delete(&self, path: &Path) -> Result<(), DeleteError> {
        fs::remove_file(path)
            .await
            .map_err(|e| DeleteError::from_io(path.to_path_buf(), e))
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<(), SyncError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|source| SyncError::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })
    }

    async fn check_access(&self, dir: &Path) -> Result<(), SyncError> {
        // Listing proves read access
        fs::read_dir(dir)
            .await
            .map_err(|source| SyncError::DirectoryUnreadable {
                path: dir.to_path_buf(),
                source,
            })?;

        // Write access for the current user: create and remove a scratch file
        let check = dir.join(format!(".plsync-write-check-{}", Uuid::new_v4()));
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&check)
            .await
            .map_err(|_| SyncError::DirectoryUnwritable {
                path: dir.to_path_buf(),
            })?;
        if let Err(e) = fs::remove_file(&check).await {
            warn!(path = %check.display(), error = %e, "Could not remove write check file");
        }

        Ok(())
    }

    async fn exists(&self, dir: &Path) -> Result<bool, SyncError> {
        fs::try_exists(dir)
            .await
            .map_err(|source| SyncError::DirectoryUnreadable {
                path: dir.to_path_buf(),
                source,
            })
    }
}
