//! Domain types for plsync.
//!
//! This module contains the plain data passed between pipeline stages:
//! - Catalog: remote collections, entries and accumulated snapshots
//! - Inventory: files found in a target directory
//! - Report: reconciliation queues and per-pipeline outcomes

pub mod catalog;
pub mod inventory;
pub mod report;

// Re-export commonly used types
pub use catalog::{CatalogEntry, CatalogPage, CatalogSnapshot, Collection};
pub use inventory::{LocalFile, LocalInventory};
pub use report::{
    AmbiguousIdentifier, ItemAction, ItemFailure, ReconciliationResult, ReportState, SyncReport,
};
