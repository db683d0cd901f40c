//! plsync - Mirror YouTube playlists into local audio directories
//!
//! Every playlist maps to one directory. Catalog entries missing locally are
//! downloaded, and local files whose embedded video id left the playlist are
//! deleted.
//!
//! # Architecture
//!
//! Each directory/playlist pair runs as an independent pipeline:
//! - Validate that the directory name resembles the playlist title
//! - Scan the directory and fetch every playlist page
//! - Reconcile the two identifier sets into download and delete queues
//! - Execute deletes, then downloads, one item at a time
//!
//! Nothing is persisted between runs; the queues are recomputed every time.
//!
//! # Modules
//!
//! - `adapters`: External systems (YouTube Data API, filesystem, youtube-dl)
//! - `core`: Sync engine (codec, scanner, reconciler, executor, orchestrator)
//! - `domain`: Data structures (catalog, inventory, reports)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Sync every playlist of the configured channel
//! plsync sync
//!
//! # Preview one playlist without touching files
//! plsync playlist PLxxxxxxxx "~/Music/Road Trip" --dry-run
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{reconcile, Orchestrator, SyncError, SyncJob, SyncOptions};
pub use crate::domain::{
    CatalogEntry, CatalogSnapshot, LocalFile, LocalInventory, ReconciliationResult, SyncReport,
};
