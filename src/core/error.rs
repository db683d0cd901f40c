//! Error taxonomy for sync pipelines.
//!
//! [`SyncError`] aborts one pipeline before any file is touched.
//! [`DeleteError`] fails a single queue item; the rest of the queue runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::safety::SafetyViolation;

/// Conditions that abort a single pipeline
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Catalog not found: '{0}'")]
    CatalogNotFound(String),

    #[error("Cannot create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Directory is not writable: {path}")]
    DirectoryUnwritable { path: PathBuf },

    #[error("Directory {0} is already being synced by another pipeline")]
    DirectoryBusy(PathBuf),

    #[error(transparent)]
    Safety(#[from] SafetyViolation),

    #[error("Failed to fetch catalog '{collection_id}': {message}")]
    Fetch {
        collection_id: String,
        message: String,
    },
}

impl SyncError {
    /// Wrap a collaborator error raised while reading a catalog
    pub fn fetch(collection_id: &str, err: anyhow::Error) -> Self {
        Self::Fetch {
            collection_id: collection_id.to_string(),
            message: format!("{:#}", err),
        }
    }
}

/// Failure to remove one file
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Cannot delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error raised while deleting `path`
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
