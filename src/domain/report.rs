//! Reconciliation output and per-pipeline sync reports.
//!
//! A [`ReconciliationResult`] is computed once per directory/catalog pair and
//! consumed once by the executor. A [`SyncReport`] records what one pipeline
//! planned, did and failed to do, for the operator.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{CatalogEntry, Collection};

/// An identifier matched by more than one local file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousIdentifier {
    pub id: String,
    pub file_names: Vec<String>,
}

/// Download and delete queues for one directory/catalog pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Catalog entries with no matching local file
    pub to_download: Vec<CatalogEntry>,

    /// Local file names whose identifier is gone from the catalog
    pub to_delete: Vec<String>,

    /// Identifiers absent from the catalog but held by several files.
    /// None of these files are deleted.
    pub ambiguous: Vec<AmbiguousIdentifier>,
}

impl ReconciliationResult {
    /// True when the directory already mirrors the catalog
    pub fn is_in_sync(&self) -> bool {
        self.to_download.is_empty() && self.to_delete.is_empty()
    }

    pub fn action_count(&self) -> usize {
        self.to_download.len() + self.to_delete.len()
    }
}

/// Kind of queue item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    Delete,
    Download,
}

impl std::fmt::Display for ItemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemAction::Delete => write!(f, "delete"),
            ItemAction::Download => write!(f, "download"),
        }
    }
}

/// One queue item that failed; the rest of the queue still ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub action: ItemAction,

    /// File name for deletes, entry id for downloads
    pub item: String,

    pub error: String,
}

/// Final state of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ReportState {
    /// Still executing
    Running,

    /// Both queues processed (individual items may have failed)
    Completed,

    /// Queues computed but not executed
    DryRun,

    /// Deadline hit during execution; remaining items were abandoned
    TimedOut,

    /// Aborted before any file was touched
    Failed { error: String },
}

impl Default for ReportState {
    fn default() -> Self {
        Self::Running
    }
}

/// Record of one directory/catalog pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub collection: Collection,
    pub directory: PathBuf,
    pub state: ReportState,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Score from the directory name check, when it ran
    pub similarity: Option<f64>,

    /// Number of entries accumulated from the catalog
    pub catalog_size: usize,

    /// Queues as computed by reconciliation
    #[serde(default)]
    pub plan: ReconciliationResult,

    /// File names actually removed
    #[serde(default)]
    pub deleted: Vec<String>,

    /// Entry ids actually downloaded
    #[serde(default)]
    pub downloaded: Vec<String>,

    #[serde(default)]
    pub failures: Vec<ItemFailure>,

    /// Queue items skipped because the deadline passed
    #[serde(default)]
    pub abandoned: usize,
}

impl SyncReport {
    /// Start a report for a pipeline
    pub fn new(run_id: Uuid, collection: Collection, directory: PathBuf) -> Self {
        Self {
            run_id,
            collection,
            directory,
            state: ReportState::Running,
            started_at: Utc::now(),
            completed_at: None,
            similarity: None,
            catalog_size: 0,
            plan: ReconciliationResult::default(),
            deleted: Vec::new(),
            downloaded: Vec::new(),
            failures: Vec::new(),
            abandoned: 0,
        }
    }

    /// Mark the report finished with the given state
    pub fn finish(&mut self, state: ReportState) {
        self.state = state;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the report failed
    pub fn fail(&mut self, error: impl std::fmt::Display) {
        self.finish(ReportState::Failed {
            error: error.to_string(),
        });
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ReportState::Failed { .. })
    }

    /// True when the pipeline aborted or any item failed
    pub fn has_errors(&self) -> bool {
        self.is_failed() || !self.failures.is_empty()
    }
}
