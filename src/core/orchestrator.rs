//! Main orchestrator for sync pipelines.
//!
//! One pipeline mirrors one catalog into one directory:
//! validate → scan + fetch → reconcile → delete → download.
//! Each pipeline owns its inventory, snapshot and queues. Several pipelines
//! may run at once, never two on the same directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{CatalogSource, Downloader, Filesystem};
use crate::domain::{Collection, LocalInventory, ReconciliationResult, ReportState, SyncReport};

use super::error::SyncError;
use super::executor::ActionExecutor;
use super::safety::{SafetyLimits, SafetyViolation};
use super::{fetcher, reconciler, scanner, validator};

/// Per-invocation switches
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute queues without touching the filesystem
    pub dry_run: bool,
}

/// A catalog to mirror and the directory to mirror it into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    pub collection_id: String,

    /// Display title, when already known from a listing
    pub title: Option<String>,

    pub directory: PathBuf,
}

impl SyncJob {
    /// Job for a collection id whose title still has to be looked up
    pub fn new(collection_id: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            collection_id: collection_id.into(),
            title: None,
            directory: directory.into(),
        }
    }

    /// Job for a collection obtained from a listing
    pub fn for_collection(collection: Collection, directory: impl Into<PathBuf>) -> Self {
        Self {
            collection_id: collection.id,
            title: Some(collection.title),
            directory: directory.into(),
        }
    }

    fn report(&self, run_id: Uuid) -> SyncReport {
        SyncReport::new(
            run_id,
            Collection::new(
                self.collection_id.clone(),
                self.title.clone().unwrap_or_default(),
            ),
            self.directory.clone(),
        )
    }
}

/// Main sync orchestrator
#[derive(Clone)]
pub struct Orchestrator {
    source: Arc<dyn CatalogSource>,
    fs: Arc<dyn Filesystem>,
    executor: ActionExecutor,
    limits: SafetyLimits,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(
        source: Arc<dyn CatalogSource>,
        fs: Arc<dyn Filesystem>,
        downloader: Arc<dyn Downloader>,
        limits: SafetyLimits,
    ) -> Self {
        let executor = ActionExecutor::new(fs.clone(), downloader, limits.download_timeout());
        Self {
            source,
            fs,
            executor,
            limits,
        }
    }

    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// Sync every collection of a channel into `root/<title>`
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub async fn sync_channel(
        &self,
        channel_id: &str,
        root: &Path,
        options: SyncOptions,
    ) -> Result<Vec<SyncReport>> {
        if channel_id.trim().is_empty() {
            anyhow::bail!("Channel id is empty");
        }

        let collections = self
            .source
            .list_collections(channel_id)
            .await
            .with_context(|| format!("Cannot get playlists of channel '{}'", channel_id))?;

        if collections.is_empty() {
            warn!("Channel has no playlists");
        } else {
            info!(playlists = collections.len(), "Listed playlists");
        }

        let jobs = collections
            .into_iter()
            .map(|c| {
                let directory = root.join(validator::directory_for_title(&c.title));
                SyncJob::for_collection(c, directory)
            })
            .collect();

        Ok(self.run_jobs(jobs, options).await)
    }

    /// Run jobs concurrently, one pipeline per directory.
    ///
    /// Reports come back in job order. A job whose directory was already
    /// claimed by an earlier job fails with [`SyncError::DirectoryBusy`].
    pub async fn run_jobs(&self, jobs: Vec<SyncJob>, options: SyncOptions) -> Vec<SyncReport> {
        let semaphore = Arc::new(Semaphore::new(self.limits.concurrency()));
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut reports: Vec<Option<SyncReport>> = (0..jobs.len()).map(|_| None).collect();
        let mut tasks = JoinSet::new();

        for (idx, job) in jobs.into_iter().enumerate() {
            if !claimed.insert(job.directory.clone()) {
                let err = SyncError::DirectoryBusy(job.directory.clone());
                warn!(collection = %job.collection_id, error = %err, "Skipping pipeline");
                let mut report = job.report(Uuid::new_v4());
                report.fail(err);
                reports[idx] = Some(report);
                continue;
            }

            let orchestrator = self.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (idx, orchestrator.run_pipeline(job, options).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, report)) => reports[idx] = Some(report),
                Err(e) => error!(error = %e, "Pipeline task aborted"),
            }
        }

        reports.into_iter().flatten().collect()
    }

    /// Run one pipeline to completion. Never returns an error: failures
    /// are recorded in the report.
    #[instrument(
        skip(self, job, options),
        fields(
            run_id = tracing::field::Empty,
            collection = %job.collection_id,
            directory = %job.directory.display(),
        )
    )]
    pub async fn run_pipeline(&self, job: SyncJob, options: SyncOptions) -> SyncReport {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!(dry_run = options.dry_run, "Starting pipeline");

        let deadline = Instant::now() + self.limits.pipeline_timeout();
        let mut report = job.report(run_id);

        let prepared =
            tokio::time::timeout_at(deadline, self.prepare(&job, options, &mut report)).await;

        let plan = match prepared {
            Ok(Ok(plan)) => plan,
            Ok(Err(e)) => {
                error!(error = %e, "Pipeline aborted");
                report.fail(e);
                return report;
            }
            Err(_) => {
                let e = SyncError::from(SafetyViolation::PipelineTimeout {
                    stage: "preparation",
                    limit_seconds: self.limits.pipeline_timeout_seconds,
                });
                error!(error = %e, "Pipeline aborted");
                report.fail(e);
                return report;
            }
        };

        info!(
            downloads = plan.to_download.len(),
            deletes = plan.to_delete.len(),
            ambiguous = plan.ambiguous.len(),
            "Reconciled"
        );

        if options.dry_run {
            report.finish(ReportState::DryRun);
            return report;
        }

        let outcome = self.executor.execute(&job.directory, &plan, deadline).await;
        let state = if outcome.timed_out() {
            warn!(abandoned = outcome.abandoned, "Pipeline deadline passed, remaining items abandoned");
            ReportState::TimedOut
        } else {
            ReportState::Completed
        };

        report.deleted = outcome.deleted;
        report.downloaded = outcome.downloaded;
        report.failures = outcome.failures;
        report.abandoned = outcome.abandoned;
        report.finish(state);

        info!(
            deleted = report.deleted.len(),
            downloaded = report.downloaded.len(),
            failed = report.failures.len(),
            "Pipeline finished"
        );

        report
    }

    /// Everything up to and including reconciliation; no file is touched
    /// besides creating a missing directory
    async fn prepare(
        &self,
        job: &SyncJob,
        options: SyncOptions,
        report: &mut SyncReport,
    ) -> Result<ReconciliationResult, SyncError> {
        let collection = self.resolve_collection(job).await?;
        report.collection = collection.clone();

        let score = validator::validate(&self.limits, &job.directory, &collection.title)?;
        report.similarity = Some(score);

        let directory = job.directory.as_path();
        let present = if options.dry_run {
            self.fs.exists(directory).await?
        } else {
            self.fs.ensure_dir(directory).await?;
            self.fs.check_access(directory).await?;
            true
        };

        let scan = async {
            if present {
                scanner::scan(self.fs.as_ref(), directory).await
            } else {
                Ok(LocalInventory::empty(directory))
            }
        };
        let fetch = fetcher::accumulate_catalog(self.source.as_ref(), &collection);
        let (inventory, snapshot) = tokio::try_join!(scan, fetch)?;

        report.catalog_size = snapshot.len();

        let plan = reconciler::reconcile(&inventory, &snapshot);
        for ambiguous in &plan.ambiguous {
            warn!(
                id = %ambiguous.id,
                files = ?ambiguous.file_names,
                "Several files share an identifier missing from the catalog, not deleting them"
            );
        }

        report.plan = plan.clone();
        Ok(plan)
    }

    async fn resolve_collection(&self, job: &SyncJob) -> Result<Collection, SyncError> {
        if job.collection_id.trim().is_empty() {
            return Err(SyncError::CatalogNotFound(job.collection_id.clone()));
        }

        if let Some(title) = &job.title {
            return Ok(Collection::new(job.collection_id.clone(), title.clone()));
        }

        self.source
            .find_collection(&job.collection_id)
            .await
            .map_err(|e| SyncError::fetch(&job.collection_id, e))?
            .ok_or_else(|| SyncError::CatalogNotFound(job.collection_id.clone()))
    }
}
