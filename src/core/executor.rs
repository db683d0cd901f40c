//! Queue execution.
//!
//! Hands each queue item to its collaborator one at a time. A failed item is
//! recorded and the next one runs. Once the pipeline deadline passes, the
//! remaining items are abandoned; items already done stay done.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::codec;
use crate::adapters::{Downloader, Filesystem};
use crate::domain::{ItemAction, ItemFailure, ReconciliationResult};

/// What happened to the queues of one pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub deleted: Vec<String>,
    pub downloaded: Vec<String>,
    pub failures: Vec<ItemFailure>,

    /// Items not attempted because the deadline passed
    pub abandoned: usize,
}

impl ExecutionOutcome {
    pub fn timed_out(&self) -> bool {
        self.abandoned > 0
    }

    fn record_failure(&mut self, action: ItemAction, item: &str, error: impl std::fmt::Display) {
        warn!(%action, item, error = %error, "Queue item failed");
        self.failures.push(ItemFailure {
            action,
            item: item.to_string(),
            error: error.to_string(),
        });
    }
}

/// Destination template handed to the downloader for `directory`.
///
/// The downloader expands the whole template with `%`-formatting, so a `%`
/// in the directory is doubled to stay literal.
pub fn destination_template(directory: &Path) -> PathBuf {
    let escaped = PathBuf::from(directory.to_string_lossy().replace('%', "%%"));
    escaped.join(codec::encode("%(title)s", "%(id)s", "%(ext)s"))
}

/// Dispatches delete and download queues to the collaborators
#[derive(Clone)]
pub struct ActionExecutor {
    fs: Arc<dyn Filesystem>,
    downloader: Arc<dyn Downloader>,
    download_timeout: Duration,
}

impl ActionExecutor {
    pub fn new(
        fs: Arc<dyn Filesystem>,
        downloader: Arc<dyn Downloader>,
        download_timeout: Duration,
    ) -> Self {
        Self {
            fs,
            downloader,
            download_timeout,
        }
    }

    /// Run deletes, then downloads, for one directory
    pub async fn execute(
        &self,
        directory: &Path,
        plan: &ReconciliationResult,
        deadline: Instant,
    ) -> ExecutionOutcome {
        let mut outcome = ExecutionOutcome::default();

        for (idx, file_name) in plan.to_delete.iter().enumerate() {
            if Instant::now() >= deadline {
                outcome.abandoned += plan.to_delete.len() - idx + plan.to_download.len();
                return outcome;
            }

            let path = directory.join(file_name);
            match tokio::time::timeout_at(deadline, self.fs.delete(&path)).await {
                Ok(Ok(())) => {
                    info!(file = %file_name, "Deleted");
                    outcome.deleted.push(file_name.clone());
                }
                Ok(Err(e)) => outcome.record_failure(ItemAction::Delete, file_name, e),
                Err(_) => {
                    outcome.abandoned += plan.to_delete.len() - idx + plan.to_download.len();
                    return outcome;
                }
            }
        }

        let template = destination_template(directory);

        for (idx, entry) in plan.to_download.iter().enumerate() {
            if Instant::now() >= deadline {
                outcome.abandoned += plan.to_download.len() - idx;
                return outcome;
            }

            debug!(id = %entry.id, title = %entry.display_title, "Downloading");
            let download = self
                .downloader
                .download(&entry.id, &template, self.download_timeout);

            match tokio::time::timeout_at(deadline, download).await {
                Ok(Ok(())) => {
                    info!(id = %entry.id, title = %entry.display_title, "Downloaded");
                    outcome.downloaded.push(entry.id.clone());
                }
                Ok(Err(e)) => {
                    outcome.record_failure(ItemAction::Download, &entry.id, format!("{:#}", e))
                }
                Err(_) => {
                    outcome.abandoned += plan.to_download.len() - idx;
                    return outcome;
                }
            }
        }

        outcome
    }
}
