//! Adapter interfaces for external systems.
//!
//! The engine talks to three collaborators through these traits:
//! - [`CatalogSource`]: the remote catalog API (YouTube Data API)
//! - [`Filesystem`]: the target directories
//! - [`Downloader`]: the external download tool (youtube-dl)

pub mod filesystem;
pub mod youtube;
pub mod youtube_dl;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::error::{DeleteError, SyncError};
use crate::domain::{CatalogPage, Collection};

// Re-export the production adapters
pub use filesystem::LocalFilesystem;
pub use youtube::{YouTubeClient, YouTubeConfig};
pub use youtube_dl::YoutubeDlDownloader;

/// Remote catalog API
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every collection owned by a parent (channel), in remote order
    async fn list_collections(&self, parent_id: &str) -> Result<Vec<Collection>>;

    /// Look up one collection; `None` when the id does not exist
    async fn find_collection(&self, collection_id: &str) -> Result<Option<Collection>>;

    /// Fetch one page of a collection's entries
    async fn fetch_page(&self, collection_id: &str, page_token: Option<&str>)
        -> Result<CatalogPage>;
}

/// Filesystem operations on target directories
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Names of the regular files directly inside `dir`
    async fn list_files(&self, dir: &Path) -> Result<Vec<String>, SyncError>;

    /// Remove a single file
    async fn delete(&self, path: &Path) -> Result<(), DeleteError>;

    /// Create `dir` and its parents if missing
    async fn ensure_dir(&self, dir: &Path) -> Result<(), SyncError>;

    /// Fail unless `dir` can be both listed and written
    async fn check_access(&self, dir: &Path) -> Result<(), SyncError>;

    /// Whether `dir` exists; errors when that cannot be determined
    async fn exists(&self, dir: &Path) -> Result<bool, SyncError>;
}

/// External download tool
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Human-readable downloader name
    fn name(&self) -> &str;

    /// Fetch `source_id` into a file named after `destination_template`
    async fn download(
        &self,
        source_id: &str,
        destination_template: &Path,
        timeout: Duration,
    ) -> Result<()>;
}
